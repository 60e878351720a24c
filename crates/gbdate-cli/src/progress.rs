//! Progress bar for batched downloads

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar counting accessions, hidden when stderr is not a terminal
pub fn create_accession_progress(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} accessions ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accession_progress() {
        let pb = create_accession_progress(400, "Fetching");
        assert_eq!(pb.length(), Some(400));
        pb.inc(200);
        assert_eq!(pb.position(), 200);
        pb.finish_and_clear();
    }
}
