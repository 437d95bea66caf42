//! Prompt construction: the knowledge-base context and the system instruction.
//!
//! Every document is included unconditionally; there is no relevance
//! ranking. The instruction is rebuilt from the current documents on every
//! request so that additions and removals show up in the next exchange.

use vitalsync_core::{KnowledgeDoc, UserProfile};

/// Stands in for the knowledge base when the user has no documents.
pub const NO_DOCUMENTS_PLACEHOLDER: &str = "No specific personal documents provided yet.";

/// Characters of document context included in a tip prompt.
pub const TIP_CONTEXT_LIMIT: usize = 500;

/// One `[CATEGORY] Title: Content` entry per document, blank-line separated,
/// in store order.
pub fn knowledge_context<'a>(docs: impl IntoIterator<Item = &'a KnowledgeDoc>) -> String {
    docs.into_iter()
        .map(|d| {
            format!(
                "[{}] {}: {}",
                d.category.label().to_uppercase(),
                d.title,
                d.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system instruction for the conversational assistant.
pub fn system_instruction(profile: &UserProfile, docs: &[KnowledgeDoc]) -> String {
    let context = if docs.is_empty() {
        NO_DOCUMENTS_PLACEHOLDER.to_string()
    } else {
        knowledge_context(docs)
    };

    format!(
        r#"
You are VitalSync, an advanced, personalized health and wellness assistant.
Your goal is to provide accurate, empathetic, and actionable health advice based on the user's personal context.

USER PROFILE:
Name: {name}
Age: {age}
Weight: {weight}kg
Height: {height}cm
Goal: {goal}

PERSONAL KNOWLEDGE BASE (CONTEXT):
{context}

INSTRUCTIONS:
1. Use the "PERSONAL KNOWLEDGE BASE" to answer user queries specifically. This is a RAG (Retrieval Augmented Generation) system.
2. If the user asks about their blood reports, diet plans, or history, prioritize information from the context above.
3. If the answer is not in the context, use your general medical and wellness knowledge, but clearly state that you are giving general advice.
4. Always maintain a professional, supportive, and encouraging tone.
5. Provide concise answers. Use markdown for formatting (lists, bold text).
6. IMPORTANT: You are an AI, not a doctor. If a symptom sounds serious, advise the user to see a professional immediately.

Formatting:
- Use bullet points for lists.
- Bold key terms.
- Keep paragraphs short.
"#,
        name = profile.name,
        age = profile.age,
        weight = profile.weight,
        height = profile.height,
        goal = profile.goal,
    )
}

/// One `[Category] title: content` line per document. Unlike
/// [`knowledge_context`] the category keeps its display casing.
pub fn tip_context<'a>(docs: impl IntoIterator<Item = &'a KnowledgeDoc>) -> String {
    docs.into_iter()
        .map(|d| format!("[{}] {}: {}", d.category, d.title, d.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The first `limit` characters of `text`. May cut mid-word.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the single-shot prompt for a daily tip.
pub fn tip_prompt(profile: &UserProfile, docs: &[KnowledgeDoc]) -> String {
    let context = tip_context(docs);
    format!(
        "Generate a single, short, personalized health tip (max 1 sentence) for {} based on their goal: \"{}\" and this context: {}...",
        profile.name,
        profile.goal,
        truncate_chars(&context, TIP_CONTEXT_LIMIT)
    )
}
