use std::collections::BTreeSet;
use std::env;

use resumatch_core::config::{expand_path, Config};
use resumatch_core::traits::VectorIndex;
use resumatch_core::types::{EducationLevel, Query, ScoredResult};
use resumatch_embed::get_default_embedder;
use resumatch_hybrid::MatchEngine;
use resumatch_vector::{schema::DOCUMENTS_TABLE, LanceIndex};

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} <jd|skills|education|general|list> [args...]");
    eprintln!("  jd \"<job description>\"");
    eprintln!("  skills \"<skill,skill,...>\" [--years N]");
    eprintln!("  education \"<level,level>\"         levels: phd, masters, bachelors");
    eprintln!("  general \"<question>\" [--include-notes]");
    eprintln!("  list [resume|note]");
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        usage(&prog);
    }
    let cmd = args.remove(0);

    let index_dir =
        expand_path(config.get::<String>("data.index_dir").unwrap_or_else(|_| "data/index".to_string()));
    let top_k: usize = config.get("search.top_k").unwrap_or(5);

    let index = LanceIndex::open(&index_dir, DOCUMENTS_TABLE)?;

    if cmd == "list" {
        let kind = args.first().map(String::as_str);
        let entries = index.list(kind)?;
        if entries.is_empty() {
            println!("Index is empty.");
            return Ok(());
        }
        for (id, doc_type) in entries {
            println!("{:8} {}  ({})", doc_type, display_name(&id), id);
        }
        return Ok(());
    }

    let engine = MatchEngine::new(index, get_default_embedder()?);
    let query = match cmd.as_str() {
        "jd" => Query::JobDescription { text: args.first().cloned().unwrap_or_else(|| usage(&prog)) },
        "skills" => {
            let raw = args.first().cloned().unwrap_or_else(|| usage(&prog));
            let required_skills: BTreeSet<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            let min_years = args
                .iter()
                .position(|a| a == "--years")
                .and_then(|pos| args.get(pos + 1))
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            Query::Skills { required_skills, min_years }
        }
        "education" => {
            let raw = args.first().cloned().unwrap_or_else(|| usage(&prog));
            let levels: BTreeSet<EducationLevel> =
                raw.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if levels.is_empty() {
                eprintln!("No valid education levels in '{raw}'");
                std::process::exit(1);
            }
            Query::Education { levels }
        }
        "general" => {
            let text = args.first().cloned().unwrap_or_else(|| usage(&prog));
            let include_notes = args.iter().any(|a| a == "--include-notes");
            Query::General { text, include_notes }
        }
        _ => usage(&prog),
    };

    let results = engine.search(&query, top_k)?;
    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for result in &results {
        print_result(result);
    }
    Ok(())
}

fn print_result(result: &ScoredResult) {
    println!("#{} {} (score {:.4})", result.rank, display_name(&result.id), result.final_score);
    println!("   id: {}  similarity: {:.4}", result.id, result.components.semantic);
    if let Some(s) = result.components.skills {
        println!("   skills: {s:.2}");
    }
    if let Some(e) = result.components.experience {
        println!("   experience: {e:.2}");
    }
    if let Some(c) = result.components.education {
        println!("   education confidence: {c:.2}");
    }
    println!("   {}", preview(&result.text));
}

/// First 50 whitespace-separated tokens of the document text.
fn preview(text: &str) -> String {
    let mut words = text.split_whitespace();
    let head: Vec<&str> = words.by_ref().take(50).collect();
    let mut preview = head.join(" ");
    if words.next().is_some() {
        preview.push_str("...");
    }
    preview
}

/// Candidate display name: the id stem before the first underscore.
fn display_name(id: &str) -> String {
    let stem = id.rsplit_once('.').map_or(id, |(s, _)| s);
    stem.split('_').next().unwrap_or(stem).trim().to_string()
}
