/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Render a progress snapshot as a single status line.
pub fn format_progress(progress: &adlift_core::UploadProgress) -> String {
    match &progress.job_id {
        Some(job_id) => format!(
            "[{:>10}] {:>3}% {} (job {})",
            progress.phase.to_string(),
            progress.progress,
            progress.message,
            job_id
        ),
        None => format!(
            "[{:>10}] {:>3}% {}",
            progress.phase.to_string(),
            progress.progress,
            progress.message
        ),
    }
}
