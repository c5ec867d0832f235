use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use klbulletin::api::{ApiConfig, ResultsClient};
use klbulletin::bootstrap::BackendChain;
use klbulletin::format::{amount_label, format_draw_date};
use klbulletin::rendering::html::HtmlBackend;
use klbulletin::rendering::pdf::PdfBackend;
use klbulletin::{
    normalize, output, BackendKind, ConsolationStyle, LayoutConfig, LotteryResult, OverflowPolicy,
    RenderBackend,
};

#[derive(Debug, Parser)]
#[command(
    name = "klbulletin",
    version,
    about = "Render Kerala lottery results as printable bulletins"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a result JSON file (bare result or API detail response).
    Render {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Fetch one result from the results API and render it.
    Fetch {
        #[arg(long)]
        unique_id: String,
        #[command(flatten)]
        api: ApiArgs,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// List recent draws from the results API.
    List {
        #[command(flatten)]
        api: ApiArgs,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Html,
}

impl From<Format> for BackendKind {
    fn from(f: Format) -> Self {
        match f {
            Format::Pdf => BackendKind::Pdf,
            Format::Html => BackendKind::Html,
        }
    }
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long, value_enum, default_value = "pdf")]
    format: Format,
    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Layout config JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop sections that do not fit instead of adding pages.
    #[arg(long)]
    single_page: bool,
    /// Show consolation prizes as a series line instead of a grid.
    #[arg(long)]
    series: bool,
    #[arg(long)]
    no_watermark: bool,
    /// Page margin in mm.
    #[arg(long)]
    margin: Option<f32>,
    /// HTML only: open the print dialog when the page loads.
    #[arg(long)]
    auto_print: bool,
    /// PDF only: TrueType/OpenType face used for the Malayalam footer.
    #[arg(long)]
    malayalam_font: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ApiArgs {
    /// Results API base URL.
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl ApiArgs {
    fn client(&self) -> Result<ResultsClient> {
        let mut config = ApiConfig::default();
        if let Some(base) = &self.api_base {
            config.base_url = base.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        Ok(ResultsClient::new(config)?)
    }
}

impl RenderArgs {
    fn layout_config(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading layout config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing layout config {}", path.display()))?
            }
            None => LayoutConfig::default(),
        };
        if self.single_page {
            config.overflow = OverflowPolicy::SinglePage;
        }
        if self.series {
            config.consolation_style = ConsolationStyle::Series;
        }
        if self.no_watermark {
            config.watermark.enabled = false;
        }
        if let Some(margin) = self.margin {
            config.page.margin = margin;
        }
        config.validate().context("layout config rejected")?;
        Ok(config)
    }

    fn backend(&self) -> Result<Box<dyn RenderBackend>> {
        let kind = BackendKind::from(self.format);
        if kind == BackendKind::Html && self.auto_print {
            return Ok(Box::new(HtmlBackend::new().with_auto_print(true)));
        }
        if let (BackendKind::Pdf, Some(path)) = (kind, &self.malayalam_font) {
            let backend = PdfBackend::new()
                .with_malayalam_font_file(path)
                .with_context(|| format!("loading Malayalam font {}", path.display()))?;
            return Ok(Box::new(backend));
        }
        let backend = BackendChain::preferring(kind).acquire()?;
        if backend.kind() != kind {
            log::warn!("{} backend unavailable, rendering {} instead", kind, backend.kind());
        }
        Ok(backend)
    }

    fn render(&self, result: &LotteryResult) -> Result<PathBuf> {
        let config = self.layout_config()?;
        let backend = self.backend()?;
        let doc = klbulletin::render_document(result, &config, backend.as_ref())
            .context("rendering bulletin")?;
        for w in &doc.warnings {
            log::warn!("{}", w);
        }
        for note in &doc.notes {
            log::info!("{}", note);
        }
        let path = output::write_document(&self.out, &doc)
            .with_context(|| format!("writing {} into {}", doc.file_name, self.out.display()))?;
        Ok(path)
    }
}

fn read_result(path: &Path) -> Result<LotteryResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading result {}", path.display()))?;
    let result = normalize::normalize_str(&text)
        .with_context(|| format!("normalizing result {}", path.display()))?;
    Ok(result)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render { input, render } => {
            let result = read_result(&input)?;
            let path = render.render(&result)?;
            println!("{}", path.display());
        }
        Command::Fetch {
            unique_id,
            api,
            render,
        } => {
            let result = api
                .client()?
                .fetch_result(&unique_id)
                .with_context(|| format!("fetching result {}", unique_id))?;
            let path = render.render(&result)?;
            println!("{}", path.display());
        }
        Command::List { api } => {
            let list = api.client()?.fetch_list().context("fetching result list")?;
            for s in list {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.unique_id,
                    format_draw_date(&s.date, "N/A"),
                    s.draw_number.as_deref().unwrap_or("N/A"),
                    s.lottery_name.as_deref().unwrap_or("N/A"),
                    s.first_prize_amount.map(amount_label).unwrap_or_default(),
                );
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse())
}
