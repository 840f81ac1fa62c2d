use genki_sheets::{
    AssetFetcher, FontLibrary, GenerationConfig, PipelineError, Worksheet, install_font,
};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "download")]
fn fetcher() -> impl AssetFetcher {
    genki_sheets::HttpFetcher
}

#[cfg(not(feature = "download"))]
fn fetcher() -> impl AssetFetcher {
    genki_sheets::OfflineFetcher
}

/// Generates every worksheet into the working directory.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&GenerationConfig::default()) {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("{} document(s) failed", failed);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error ({}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}

/// Returns the number of documents that were not produced.
fn run(config: &GenerationConfig) -> Result<usize, PipelineError> {
    let start = Instant::now();
    let mut fonts = FontLibrary::new();
    let outcome = install_font(&mut fonts, &config.font, &fetcher(), &config.font_setup())?;
    let fonts = Arc::new(fonts);

    let mut failed = 0;
    for sheet in Worksheet::all()? {
        if sheet.requires_font && outcome.is_fallback() {
            log::error!(
                "Skipping {}: it needs the Japanese font, which is unavailable",
                sheet.filename
            );
            println!("Skipped:   {}", sheet.filename);
            failed += 1;
            continue;
        }
        match sheet.generate(fonts.clone(), &config.output_dir) {
            Ok(summary) => println!(
                "Generated: {} ({} page{})",
                summary.path.display(),
                summary.pages,
                if summary.pages == 1 { "" } else { "s" }
            ),
            Err(e) => {
                log::error!("{} failed ({}): {}", sheet.filename, e.kind(), e);
                println!("Failed:    {}", sheet.filename);
                failed += 1;
            }
        }
    }

    log::info!("Finished in {:.2?}", start.elapsed());
    Ok(failed)
}
