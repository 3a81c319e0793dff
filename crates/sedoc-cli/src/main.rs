use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use sedoc_common::{Config, EditorSession, FileStore, LinkMode, OglinkSource, VideoStrategy};
use sedoc_renderer::{
    Component, DocumentModel, DocumentSynthesizer, HttpLinkServices, LinkPreviewResolver,
    PopulationParams, PostSettings, RequestPayload, SynthesisOptions, Upconverter,
    markdown_to_components, parse,
};

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "sedoc - Markdown to blog editor documents", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true, env = "SEDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RenderArgs {
    /// Markdown file, or `-` for stdin
    input: PathBuf,

    /// How generic links become components
    #[arg(long)]
    mode: Option<LinkMode>,

    /// What to do with video links
    #[arg(long)]
    video: Option<VideoStrategy>,

    /// Where oglink cards get their data
    #[arg(long)]
    oglink_source: Option<OglinkSource>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the component array for a Markdown file
    Convert {
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Print the request form fields for a Markdown file
    Payload {
        #[command(flatten)]
        render: RenderArgs,

        /// Target blog id
        #[arg(long)]
        blog_id: Option<String>,

        /// Category to post into
        #[arg(long)]
        category: Option<u32>,

        /// 0 = private, 1 = neighbours, 2 = public
        #[arg(long)]
        open_type: Option<u8>,

        /// Comma separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Print the parsed title and blocks
    Blocks {
        /// Markdown file, or `-` for stdin
        input: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a cookie string into a session
    Session {
        /// `document.cookie` style string
        #[arg(long)]
        cookies: String,

        /// Page URL the cookies were read from
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Convert { render } => {
            let config = load_config(&config_path, &render).await?;
            let components = convert(&render.input, &config).await?;
            print_json(&components, render.pretty)?;
        }
        Commands::Payload {
            render,
            blog_id,
            category,
            open_type,
            tags,
        } => {
            let mut config = load_config(&config_path, &render).await?;
            if let Some(category) = category {
                config.category_id = category;
            }
            if let Some(open_type) = open_type {
                config.open_type = open_type;
            }
            let blog_id = blog_id.or_else(|| config.blog_id.clone()).ok_or_else(|| {
                miette::miette!("Blog id required. Pass --blog-id or set blogId in the config")
            })?;

            let components = convert(&render.input, &config).await?;
            let model = DocumentModel::new(components);
            let settings = PostSettings {
                tags,
                ..PostSettings::from(&config)
            };
            let params = PopulationParams::new(&settings);
            let payload = RequestPayload::new(blog_id, &model, &params).into_diagnostic()?;
            print_json(&payload, render.pretty)?;
        }
        Commands::Blocks { input, pretty } => {
            let markdown = read_input(&input)?;
            print_json(&parse(&markdown), pretty)?;
        }
        Commands::Session { cookies, url } => {
            let session = EditorSession::from_cookie_header(&cookies, url.as_deref());
            if !session.is_logged_in() {
                tracing::warn!("no cookies found in input");
            }
            print_json(&session, true)?;
        }
    }

    Ok(())
}

async fn load_config(path: &Path, render: &RenderArgs) -> Result<Config> {
    let mut config = Config::load(&FileStore::new(path)).await?;
    tracing::debug!(path = %path.display(), "loaded config");
    if let Some(mode) = render.mode {
        config.link_mode = mode;
    }
    if let Some(video) = render.video {
        config.video_strategy = video;
    }
    if let Some(source) = render.oglink_source {
        config.oglink_source = source;
    }
    Ok(config)
}

/// Upconversion and live previews are the only network users.
fn needs_network(config: &Config) -> bool {
    match config.link_mode {
        LinkMode::Simple => false,
        LinkMode::Upconvert => true,
        LinkMode::OglinkCard => config.oglink_source == OglinkSource::Live,
    }
}

async fn convert(input: &Path, config: &Config) -> Result<Vec<Component>> {
    let markdown = read_input(input)?;
    let options = SynthesisOptions::from(config);
    if needs_network(config) {
        let services = HttpLinkServices::from_config(config)?;
        Ok(run(&markdown, DocumentSynthesizer::new(options, services)).await)
    } else {
        Ok(run(&markdown, DocumentSynthesizer::offline(options)).await)
    }
}

async fn run<S>(markdown: &str, synthesizer: DocumentSynthesizer<S>) -> Vec<Component>
where
    S: LinkPreviewResolver + Upconverter,
{
    markdown_to_components(markdown, &synthesizer).await
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("Failed to read {}", input.display())))
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .into_diagnostic()?;
    println!("{out}");
    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sedoc")
        .join("config.json")
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
