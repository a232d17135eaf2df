use reaper_domain::{BatchResult, NotificationMessage, Operation};

pub const REPORT_TITLE: &str = "Slow operations killed";

/// Renders the batch as markdown: killed operations first, then the ones
/// that could not be killed. Numbering runs across both blocks.
pub fn compose_report(batch: &BatchResult) -> NotificationMessage {
    let mut text = format!(
        "### {REPORT_TITLE}\n\n> killed: {}, failed: {}\n",
        batch.succeeded.len(),
        batch.failed.len()
    );

    let mut index = 0;
    for operation in &batch.succeeded {
        index += 1;
        push_section(&mut text, index, operation, "killed");
    }
    for kill in &batch.failed {
        index += 1;
        let status = format!("kill failed: {}", kill.cause);
        push_section(&mut text, index, &kill.operation, &status);
    }

    NotificationMessage::new(REPORT_TITLE, text)
}

fn push_section(text: &mut String, index: usize, operation: &Operation, status: &str) {
    let command = serde_json::to_string(&operation.command).unwrap_or_else(|_| "{}".to_string());
    let client = if operation.client.is_empty() {
        "unknown"
    } else {
        operation.client.as_str()
    };
    let fence = fence_for(&command);
    text.push_str(&format!(
        "\n#### {index}. {client}\n\n\
         - opid: {opid}\n\
         - running: {secs}s\n\
         - status: **{status}**\n\n\
         {fence}json\n{command}\n{fence}\n",
        opid = operation.opid,
        secs = operation.secs_running,
    ));
}

/// Code fence one backtick longer than the longest backtick run in
/// `body`, so the payload can never close it early.
fn fence_for(body: &str) -> String {
    let longest = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}
