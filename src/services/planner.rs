use crate::{
    error::{AppError, AppResult},
    services::providers::CompletionProvider,
};

/// Fixed instruction for the goal-reduction prompt. The whole tool is this
/// one constraint set: shrink a big goal into one immediately startable
/// action.
pub const SYSTEM_PROMPT: &str = "\
You are a tool that breaks plans into tiny pieces.

Rewrite the user's goal as a single very small action they can start today.

Rules:
1. The action must be finishable within 5-10 minutes.
2. It must need no special materials and no expertise.
3. It must be very unlikely to fail.
4. Suggest only the first action, never the whole plan.
5. Reply with the action as one sentence and nothing else.";

/// Returned when the model produces no usable text
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "Please restate your goal as one concrete sentence (e.g. \"start studying unit 1 for finals\").";

/// Reduces a big goal to one tiny first action
///
/// Blank goals and missing credentials are rejected before any network
/// call. The extraction policy keeps only the first non-empty line of the
/// completion text; models occasionally append commentary on later lines
/// despite the instruction. Upstream errors propagate to the caller
/// verbatim; there is no partial success on this path.
pub async fn reduce_goal(
    completions: &dyn CompletionProvider,
    goal: &str,
    model: &str,
) -> AppResult<String> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(AppError::InvalidInput("Goal cannot be empty".to_string()));
    }

    let user_prompt = format!("Goal: \"{}\"", goal);
    let text = completions
        .complete(model, SYSTEM_PROMPT, &user_prompt)
        .await?;

    let action = first_non_empty_line(&text);

    if action.is_empty() {
        tracing::info!(model = %model, "Empty completion, returning fallback action");
        return Ok(EMPTY_RESPONSE_FALLBACK.to_string());
    }

    tracing::info!(
        model = %model,
        action_chars = action.len(),
        "Goal reduced to micro action"
    );

    Ok(action.to_string())
}

fn first_non_empty_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}
