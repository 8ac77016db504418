use std::env;
use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use resumatch_core::config::{expand_path, Config};
use resumatch_core::loader;
use resumatch_core::traits::VectorIndex;
use resumatch_core::types::{DOC_TYPE_NOTE, DOC_TYPE_RESUME};
use resumatch_embed::get_default_embedder;
use resumatch_hybrid::MatchEngine;
use resumatch_vector::{schema::DOCUMENTS_TABLE, LanceIndex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut resumes_dir = None;
    let mut notes_dir = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--resumes" => {
                if i + 1 < args.len() {
                    resumes_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --resumes requires a directory");
                    std::process::exit(1);
                }
            }
            "--notes" => {
                if i + 1 < args.len() {
                    notes_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --notes requires a directory");
                    std::process::exit(1);
                }
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let resumes_dir = resumes_dir.unwrap_or_else(|| {
        expand_path(config.get::<String>("data.resumes_dir").unwrap_or_else(|_| "data/resumes".to_string()))
    });
    let notes_dir = notes_dir.unwrap_or_else(|| {
        expand_path(config.get::<String>("data.notes_dir").unwrap_or_else(|_| "data/notes".to_string()))
    });
    let index_dir =
        expand_path(config.get::<String>("data.index_dir").unwrap_or_else(|_| "data/index".to_string()));

    println!("Resume Indexer\n==============");
    println!("Resumes directory: {}", resumes_dir.display());
    println!("Notes directory:   {}", notes_dir.display());

    let mut docs = loader::load_dir(&resumes_dir, DOC_TYPE_RESUME)?;
    docs.extend(loader::load_dir(&notes_dir, DOC_TYPE_NOTE)?);
    if docs.is_empty() {
        println!("No .txt documents found; nothing to do.");
        return Ok(());
    }

    let index = LanceIndex::open(&index_dir, DOCUMENTS_TABLE)?;
    let embedder = get_default_embedder()?;
    let engine = MatchEngine::new(index, embedder);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Embedding and indexing {} documents...", docs.len()));
    let written = engine.index_documents(&docs)?;
    pb.finish_and_clear();

    println!("✅ Indexing complete: {} written, {} unchanged", written, docs.len() - written);
    println!("📊 Index now holds {} documents at {}", engine.index().len()?, index_dir.display());
    Ok(())
}
