//! Docs command - list the knowledge base.

use vitalsync_core::{seed, KnowledgeDoc};

pub(crate) fn run(full: bool, json: bool) -> miette::Result<()> {
    let docs = seed::initial_documents();

    if json {
        let out = serde_json::to_string_pretty(&docs)
            .map_err(|e| miette::miette!("Failed to serialize documents: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    println!("Knowledge Base ({} documents)", docs.len());
    println!();
    for doc in &docs {
        print_doc(doc, full);
    }

    Ok(())
}

pub(crate) fn print_doc(doc: &KnowledgeDoc, full: bool) {
    println!(
        "  [{}] {}  ({}, added {})",
        doc.id,
        doc.title,
        doc.category,
        doc.date_added.format("%Y-%m-%d")
    );
    if full {
        println!("      {}", doc.content);
    }
}
