use clap::clap_app;
use log::{error, info, warn, LevelFilter};
use std::{env, error, process::exit};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use ytmeta::{
    parts::Context,
    query::{self, ShareParams},
    render::Page,
    yt, Config,
};

mod ytlog {
    use chrono::Utc;
    use log::{max_level, Log, Metadata, Record};

    /// Logs to stderr, since stdout may carry the report.
    pub struct StderrLogger;

    impl Log for StderrLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                eprintln!("{} - {} - {}", Utc::now(), record.level(), record.args());
            }
        }

        fn flush(&self) {}
    }
}

static LOGGER: ytlog::StderrLogger = ytlog::StderrLogger;

const DEFAULT_SHARE_BASE: &str = "https://ytmeta.invalid/";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<(dyn error::Error + 'static)>> {
    let matches = clap_app!(ytmeta =>
        (version: "0.0.1")
        (author: "krashanoff <leo@krashanoff.com>")
        (about: "Grab everything publicly available about a YouTube video, playlist or channel.")
        (@arg verbose: -v ... "Increases program verbosity")
        (@arg key: -k --key +takes_value "YouTube Data API key. Defaults to $YOUTUBE_API_KEY.")
        (@arg maps_key: --("maps-key") +takes_value
            "Google Maps Static API key. Defaults to $GOOGLE_MAPS_KEY.")
        (@arg link: -l --link +takes_value conflicts_with[INPUT]
            "Pre-fill the input from a share link; submits only if the link says so")
        (@arg share_base: --("share-base") +takes_value "Base URL that share links point at")
        (@arg output: -o --output +takes_value "Writes the report to a file instead of stdout")
        (@arg INPUT: "Video, playlist or channel URL or ID")
    )
    .get_matches();

    if let Err(e) = log::set_logger(&LOGGER).map(|()| {
        log::set_max_level(match matches.occurrences_of("verbose") {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
    }) {
        panic!("Failed to initialize logger! {}", e)
    }

    // Work out what to look up, and whether to look it up at all.
    let (input, submit) = match (matches.value_of("INPUT"), matches.value_of("link")) {
        (Some(input), _) => (input.to_string(), true),
        (None, Some(link)) => {
            let params = ShareParams::parse(link)?;
            (params.url.unwrap_or_default(), params.submit)
        }
        (None, None) => {
            error!("Nothing to look up! Pass a URL, an ID, or --link.");
            exit(2)
        }
    };

    let mut config = Config::new(
        matches
            .value_of("key")
            .map(str::to_string)
            .or_else(|| env::var("YOUTUBE_API_KEY").ok())
            .unwrap_or_default(),
    );
    config.maps_key = matches
        .value_of("maps_key")
        .map(str::to_string)
        .or_else(|| env::var("GOOGLE_MAPS_KEY").ok());

    let share_base = matches.value_of("share_base").unwrap_or(DEFAULT_SHARE_BASE);
    let share_link = query::share_link(share_base, &input)?;

    let mut page = Page::new();
    page.set_input(input.as_str(), Some(share_link));
    page.rebuild();

    let parsed = query::classify(&input);
    info!("Classified {:?} as {}", input, parsed);

    if !submit {
        warn!("Share link does not ask to submit; writing an empty report");
    } else if !parsed.is_recognized() {
        error!("Didn't recognize {:?}; writing an empty report", input);
    } else {
        let client = yt::Client::new(&config)?;
        let ctx = Context {
            maps_key: config.maps_key.clone(),
            ..Context::default()
        };

        // A failed lookup still produces the page, as the browser would.
        if let Err(e) = yt::submit(&mut page, &client, parsed, &ctx).await {
            error!("{}", e);
        }
    }

    let html = page.to_html();
    match matches.value_of("output") {
        Some(path) => {
            let mut dest = OpenOptions::new()
                .read(false)
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .await?;
            dest.write_all(html.as_bytes()).await?;
            info!("Wrote report to {}", path);
        }
        None => print!("{}", html),
    }

    Ok(())
}
