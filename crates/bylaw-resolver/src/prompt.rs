//! Query text sent to the knowledge service.
//!
//! Both prompts end by spelling out the JSON shape the reply should take.
//! The service does not always comply, which is why replies go through
//! [`bylaw_knowledge::ReplyShape`] before parsing.

use bylaw_core::ProjectRecord;

/// Reply shape requested for rule lookups. Matches [`bylaw_core::RuleSet`].
const RULES_SHAPE: &str = r#"{"height_max": 0, "height_clause": "...", "setback": {"front": 0, "rear": 0, "side": 0, "front_clause": "...", "rear_clause": "...", "side_clause": "..."}, "parking_min": 0, "parking_clause": "...", "far_max": 0, "far_clause": "..."}"#;

/// Reply shape requested for questions. Matches [`bylaw_core::BylawAnswer`].
const ANSWER_SHAPE: &str =
    r#"{"answer": "...", "clause": "BBMP 2019, Clause 4.2.1", "page": "32"}"#;

/// Ask for the four limits that apply to `record`, each with its clause.
pub fn rules_query(document_id: &str, record: &ProjectRecord) -> String {
    format!(
        "From document {document_id} (Bangalore building bylaws), give the numeric limits \
         and exact clause references for:\n\
         1) maximum building height (m) for a {building_type} building at {location}\n\
         2) minimum front, rear and side setbacks (m)\n\
         3) minimum number of parking spaces\n\
         4) maximum floor area ratio (FAR)\n\
         Reply with JSON only, in this shape: {RULES_SHAPE}",
        building_type = record.building_type.trim(),
        location = record.location.trim(),
    )
}

/// Ask a free-text question, optionally grounded in a project record.
pub fn answer_query(document_id: &str, question: &str, context: Option<&ProjectRecord>) -> String {
    let mut prompt = format!(
        "You answer questions from the Bangalore building bylaws, document {document_id}. \
         Answer in 1-3 sentences and include: (a) a short numeric figure if one applies, \
         (b) the clause citation and page number if available, (c) one actionable note."
    );
    if let Some(record) = context {
        match serde_json::to_string(record) {
            Ok(json) => {
                prompt.push_str("\nProject context: ");
                prompt.push_str(&json);
            }
            Err(e) => tracing::debug!(error = %e, "project context not serializable, omitted"),
        }
    }
    prompt.push_str("\nQuestion: ");
    prompt.push_str(question);
    prompt.push_str("\nReply with JSON only, in this shape: ");
    prompt.push_str(ANSWER_SHAPE);
    prompt
}
