use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

/// A byte progress bar for a response body. Unknown lengths get a spinner.
pub fn create_progress_bar(len: Option<u64>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let (pb, template) = match len {
        Some(len) => (ProgressBar::new(len), BAR_TEMPLATE),
        None => (ProgressBar::new_spinner(), SPINNER_TEMPLATE),
    };

    match ProgressStyle::with_template(template) {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => tracing::debug!("invalid progress template: {}", e),
    }

    pb
}

pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "download".to_owned(),
        _ => cleaned,
    }
}
