//! Prompt templates for refinement and fallback calls.

/// Ask the LLM to tailor a stored FAQ answer to the user's phrasing.
pub fn refine_prompt(user_query: &str, base_answer: &str) -> String {
    format!(
        "You are a helpful customer support assistant.\n\
         \n\
         User asked: \"{user_query}\"\n\
         FAQ system returned this answer: \"{base_answer}\"\n\
         \n\
         Improve this answer in a polite, friendly, and clear manner.\n\
         If the FAQ answer is too short or incomplete, expand it.\n\
         Respond in simple English."
    )
}

/// Ask the LLM to answer a query no FAQ covers.
pub fn fallback_prompt(user_query: &str) -> String {
    format!(
        "You are a customer support assistant. The user asked: \"{user_query}\"\n\
         \n\
         No matching FAQ exists. Provide a useful, short, friendly answer.\n\
         If the question requires account-specific or order-specific info,\n\
         politely ask the user to contact human support."
    )
}
