//! Demo runner for tabkit

use anyhow::Result;
use tabkit_demo::{init_logging, run_copy_demo, run_distance_demo, run_reader_demo, DemoConfig};

fn main() -> Result<()> {
    let config = DemoConfig::from_env()?;
    init_logging(&config.log_filter)?;

    println!("=== Copy pipeline ===");
    println!(
        "{} -> {} (waiting {}s first)",
        config.source_path.display(),
        config.sink_path.display(),
        config.wait_seconds
    );

    let report = run_copy_demo(&config)?;
    println!("\nSink before:\n{}", report.before);
    println!("Sink after:\n{}", report.after);
    println!("Activities run: {}", report.stats.activities_run);
    println!("Total time:     {:?}", report.stats.execution_time);

    println!("\n=== Readers ===");
    for (title, rendered) in run_reader_demo(&config)? {
        println!("\n{title}\n");
        println!("{rendered}");
    }

    println!("\n=== Distances ===");
    for line in run_distance_demo()? {
        println!("{line}");
    }

    Ok(())
}
