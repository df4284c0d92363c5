//! CLI binary for ocr-toolkit.
//!
//! A thin shim over the library crate: one subcommand per action, flags
//! mapped onto the config structs, results written to files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use ocr_toolkit::pipeline::input::load_input;
use ocr_toolkit::{
    extract_image_text, extract_pdf_text, inspect, number_to_speech, pdf_to_speech,
    write_text_output, CancelFlag, ExtractionConfig, ExtractionMethod, ExtractionProgress,
    GoogleTranslateTts, Language, OcrEngine, OcrLanguages, PageRange, ProgressCallback,
    RangeRequest, SpeechConfig, TesseractCli, VisionOcr, VisionOcrConfig,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Characters of extracted text echoed to the terminal.
const PREVIEW_CHARS: usize = 1000;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Progress callback ────────────────────────────────────────────────────────

/// Terminal progress: an indicatif bar with one log line per page, plus
/// optional preview images written to a directory.
struct CliProgress {
    bar: Option<ProgressBar>,
    preview_dir: Option<PathBuf>,
}

impl CliProgress {
    fn new(show_bar: bool, preview_dir: Option<PathBuf>) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let spinner_style =
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(spinner_style);
            bar.set_prefix("Preparing");
            bar.set_message("Opening PDF…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            preview_dir,
        })
    }

    fn println(&self, line: String) {
        if let Some(ref bar) = self.bar {
            bar.println(line);
        }
    }
}

impl ExtractionProgress for CliProgress {
    fn on_extraction_start(&self, range: PageRange, total_batches: usize) {
        let Some(ref bar) = self.bar else { return };
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_length(range.len() as u64);
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.set_message("");
        bar.reset_eta();
        bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Pages {range} ({} pages, {total_batches} batch(es))",
                range.len()
            ))
        ));
    }

    fn on_batch_start(&self, _batch_num: usize, batch: PageRange) {
        self.println(format!("{} Processing pages {batch}…", cyan("▸")));
    }

    fn wants_previews(&self) -> bool {
        self.preview_dir.is_some()
    }

    fn on_page_preview(&self, page_num: usize, preview: &DynamicImage) {
        let Some(ref dir) = self.preview_dir else { return };
        let path = dir.join(format!("page_{page_num:04}.png"));
        if let Err(e) = preview.save(&path) {
            warn!("Could not save preview {}: {}", path.display(), e);
        }
    }

    fn on_page_needs_ocr(&self, page_num: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("page {page_num}: running OCR"));
        }
    }

    fn on_page_complete(&self, page_num: usize, method: ExtractionMethod, chars: usize) {
        self.println(format!(
            "  {} Page {:>3}  {:<10}  {}",
            green("✓"),
            page_num,
            method.label(),
            dim(&format!("{chars:>5} chars")),
        ));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_page_error(&self, page_num: usize, error: &str) {
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.println(format!("  {} Page {:>3}  {}", red("✗"), page_num, red(&msg)));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let Some(ref bar) = self.bar else { return };
        bar.finish_and_clear();

        let failed = total_pages.saturating_sub(success_count);
        if failed == 0 {
            eprintln!(
                "{} {} pages extracted",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages extracted  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

// ── CLI definition ───────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Text from pages 1-50 (text layer, OCR for scanned pages)
  ocr-toolkit pdf-text report.pdf

  # Pages 10-25 of an Urdu/English scan, saving page previews
  ocr-toolkit --lang urdu --lang english pdf-text scan.pdf --start 10 --end 25 --preview-dir previews/

  # OCR a few photos
  ocr-toolkit image-text page1.jpg page2.png -o notes.txt

  # Read pages 1-10 aloud in Urdu
  ocr-toolkit --lang urdu pdf-audio book.pdf

  # Speak a number
  ocr-toolkit number-audio 1,250,000 --speech-lang urdu

  # Page count and metadata
  ocr-toolkit inspect report.pdf

REQUIREMENTS:
  pdfium        libpdfium next to the working directory or installed system-wide
  tesseract     with eng and urd traineddata (default OCR engine)
  network       speech synthesis uses Google Translate

ENVIRONMENT VARIABLES:
  OCR_TOOLKIT_LANG          Comma-separated OCR languages (English,Urdu)
  OCR_TOOLKIT_OCR_ENGINE    tesseract | vision
  OCR_TOOLKIT_PDFIUM_LIB    Path to libpdfium
  OPENAI_API_KEY            API key for the vision OCR engine
  EDGEQUAKE_PROVIDER        Vision provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL           Vision model ID
  RUST_LOG                  Log filter, overrides --verbose/--quiet
"#;

/// Extract text from PDFs and images, and turn text or numbers into speech.
#[derive(Parser, Debug)]
#[command(
    name = "ocr-toolkit",
    version,
    about = "Extract text from PDFs and images; speak PDFs and numbers in English or Urdu",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OCR language(s); repeat for mixed-script pages.
    #[arg(
        long = "lang",
        global = true,
        env = "OCR_TOOLKIT_LANG",
        value_delimiter = ',',
        default_value = "English"
    )]
    langs: Vec<Language>,

    /// OCR engine for scanned pages and images.
    #[arg(
        long,
        global = true,
        env = "OCR_TOOLKIT_OCR_ENGINE",
        value_enum,
        default_value = "tesseract"
    )]
    ocr_engine: OcrEngineArg,

    /// tesseract program to run.
    #[arg(
        long,
        global = true,
        env = "OCR_TOOLKIT_TESSERACT",
        default_value = "tesseract"
    )]
    tesseract: PathBuf,

    /// Directory containing *.traineddata.
    #[arg(long, global = true, env = "TESSDATA_PREFIX")]
    tessdata_dir: Option<PathBuf>,

    /// Vision OCR provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, global = true, env = "EDGEQUAKE_PROVIDER")]
    vision_provider: Option<String>,

    /// Vision OCR model ID.
    #[arg(long, global = true, env = "EDGEQUAKE_MODEL")]
    vision_model: Option<String>,

    /// Path to the pdfium shared library.
    #[arg(long, global = true, env = "OCR_TOOLKIT_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, global = true, env = "OCR_TOOLKIT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print results as JSON on stdout.
    #[arg(long, global = true, env = "OCR_TOOLKIT_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, global = true, env = "OCR_TOOLKIT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "OCR_TOOLKIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "OCR_TOOLKIT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a PDF page range.
    PdfText(PdfTextArgs),
    /// OCR one or more images.
    ImageText(ImageTextArgs),
    /// Read a PDF page range aloud (MP3).
    PdfAudio(PdfAudioArgs),
    /// Speak a number in English or Urdu (MP3).
    NumberAudio(NumberAudioArgs),
    /// Print page count and metadata.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct PdfSourceArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// First page (1-indexed). Default: 1.
    #[arg(long)]
    start: Option<usize>,

    /// Last page (inclusive). Default: a fixed span after --start.
    #[arg(long)]
    end: Option<usize>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "OCR_TOOLKIT_PASSWORD")]
    password: Option<String>,

    /// Rendering DPI for pages that need OCR (72–600).
    #[arg(long, env = "OCR_TOOLKIT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Trimmed text-layer length above which OCR is skipped.
    #[arg(long, env = "OCR_TOOLKIT_TEXT_THRESHOLD", default_value_t = 30)]
    text_threshold: usize,
}

#[derive(Args, Debug)]
struct PdfTextArgs {
    #[command(flatten)]
    source: PdfSourceArgs,

    /// Write the text here ("-" for stdout).
    #[arg(short, long, default_value = "pdf_text_output.txt")]
    output: PathBuf,

    /// Pages per batch.
    #[arg(long, env = "OCR_TOOLKIT_BATCH_SIZE", default_value_t = 20)]
    batch_size: usize,

    /// Save an 80-DPI preview of every page here.
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Pause after each page, in milliseconds.
    #[arg(long, default_value_t = 0)]
    page_delay_ms: u64,
}

#[derive(Args, Debug)]
struct ImageTextArgs {
    /// Image files or URLs (PNG, JPEG, WebP).
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the text here ("-" for stdout).
    #[arg(short, long, default_value = "image_text_output.txt")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct SpeechArgs {
    /// Spoken language. Default: the first --lang.
    #[arg(long)]
    speech_lang: Option<Language>,

    /// Speak slowly.
    #[arg(long)]
    slow: bool,

    /// Timeout per synthesis request, in seconds.
    #[arg(long, env = "OCR_TOOLKIT_SPEECH_TIMEOUT", default_value_t = 30)]
    speech_timeout: u64,

    /// Retries per synthesis request.
    #[arg(long, env = "OCR_TOOLKIT_SPEECH_RETRIES", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(0..=10))]
    speech_retries: u32,
}

#[derive(Args, Debug)]
struct PdfAudioArgs {
    #[command(flatten)]
    source: PdfSourceArgs,

    #[command(flatten)]
    speech: SpeechArgs,

    /// Write the MP3 here.
    #[arg(short, long, default_value = "pdf_audio.mp3")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct NumberAudioArgs {
    /// The number, e.g. 1,250,000 or -42.
    #[arg(allow_hyphen_values = true)]
    number: String,

    #[command(flatten)]
    speech: SpeechArgs,

    /// Write the MP3 here.
    #[arg(short, long, default_value = "spoken_number.mp3")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "OCR_TOOLKIT_PASSWORD")]
    password: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OcrEngineArg {
    /// The tesseract program.
    Tesseract,
    /// In-process libtesseract.
    #[cfg(feature = "tesseract-native")]
    TesseractNative,
    /// A vision LLM via edgequake-llm.
    Vision,
}

// ── main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The progress bar is the feedback; library INFO logs would interleave
    // with it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let languages = OcrLanguages::new(cli.langs.iter().copied()).context("Invalid --lang")?;

    match &cli.command {
        Command::PdfText(args) => run_pdf_text(&cli, args, languages, show_progress).await,
        Command::ImageText(args) => run_image_text(&cli, args, languages).await,
        Command::PdfAudio(args) => run_pdf_audio(&cli, args, languages, show_progress).await,
        Command::NumberAudio(args) => run_number_audio(&cli, args, languages).await,
        Command::Inspect(args) => run_inspect(&cli, args).await,
    }
}

async fn run_pdf_text(
    cli: &Cli,
    args: &PdfTextArgs,
    languages: OcrLanguages,
    show_progress: bool,
) -> Result<()> {
    let input = load_input(&args.source.input, cli.download_timeout)
        .await
        .context("Failed to read input")?;
    let ocr = build_ocr(cli)?;

    if let Some(ref dir) = args.preview_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;
    }

    let progress = (show_progress || args.preview_dir.is_some())
        .then(|| CliProgress::new(show_progress, args.preview_dir.clone()) as ProgressCallback);

    let config = extraction_config(
        cli,
        &args.source,
        languages,
        args.batch_size,
        None,
        progress,
    )?
    .page_delay(Duration::from_millis(args.page_delay_ms))
    .build()
    .context("Invalid configuration")?;

    let result = extract_pdf_text(
        input.bytes,
        RangeRequest::new(args.source.start, args.source.end),
        &config,
        ocr,
    )
    .await
    .context("Text extraction failed")?;

    let text = result.to_labeled_text();
    write_text(&args.output, &text).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        print_preview(&text);
        eprintln!(
            "{}  pages {}  {} text layer / {} OCR / {} failed  {}ms  →  {}",
            if result.stats.failed_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            result.range,
            result.stats.text_layer_pages,
            result.stats.ocr_pages,
            result.stats.failed_pages,
            result.stats.total_duration_ms,
            bold(&args.output.display().to_string()),
        );
    }
    Ok(())
}

async fn run_image_text(cli: &Cli, args: &ImageTextArgs, languages: OcrLanguages) -> Result<()> {
    let mut images = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let loaded = load_input(input, cli.download_timeout)
            .await
            .with_context(|| format!("Failed to read {input}"))?;
        images.push(loaded.bytes);
    }
    let ocr = build_ocr(cli)?;

    let result =
        tokio::task::spawn_blocking(move || extract_image_text(&images, ocr.as_ref(), &languages))
            .await
            .context("OCR task failed")?
            .context("Image OCR failed")?;

    let text = result.to_labeled_text();
    write_text(&args.output, &text).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        print_preview(&text);
        eprintln!(
            "{}  {} image(s)  →  {}",
            green("✔"),
            result.fragments.len(),
            bold(&args.output.display().to_string())
        );
    }
    Ok(())
}

async fn run_pdf_audio(
    cli: &Cli,
    args: &PdfAudioArgs,
    languages: OcrLanguages,
    show_progress: bool,
) -> Result<()> {
    let input = load_input(&args.source.input, cli.download_timeout)
        .await
        .context("Failed to read input")?;
    let ocr = build_ocr(cli)?;
    let language = args.speech.speech_lang.unwrap_or(languages.primary());

    let progress = show_progress.then(|| CliProgress::new(true, None) as ProgressCallback);
    let config = extraction_config(
        cli,
        &args.source,
        languages,
        usize::MAX,
        Some(ocr_toolkit::config::AUDIO_DEFAULT_SPAN),
        progress,
    )?
    .build()
    .context("Invalid configuration")?;

    let speech = speech_config(&args.speech)?;
    let tts = GoogleTranslateTts::new()?;

    let (result, audio) = pdf_to_speech(
        input.bytes,
        RangeRequest::new(args.source.start, args.source.end),
        &config,
        ocr,
        language,
        &tts,
        &speech,
    )
    .await
    .context("PDF to audio failed")?;

    audio
        .write_to(&args.output)
        .await
        .context("Failed to write audio")?;

    if cli.json {
        let json = serde_json::json!({
            "extraction": result,
            "audio": audio,
            "output": args.output,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        print_preview(&audio.text);
        eprintln!(
            "{}  pages {}  {} in {} chunk(s), {} bytes  →  {}",
            green("✔"),
            result.range,
            language,
            audio.chunks,
            audio.len(),
            bold(&args.output.display().to_string())
        );
    }
    Ok(())
}

async fn run_number_audio(
    cli: &Cli,
    args: &NumberAudioArgs,
    languages: OcrLanguages,
) -> Result<()> {
    let language = args.speech.speech_lang.unwrap_or(languages.primary());
    let speech = speech_config(&args.speech)?;
    let tts = GoogleTranslateTts::new()?;

    let (spoken, audio) = number_to_speech(&args.number, language, &tts, &speech)
        .await
        .context("Number to audio failed")?;

    audio
        .write_to(&args.output)
        .await
        .context("Failed to write audio")?;

    if cli.json {
        let json = serde_json::json!({
            "number": spoken,
            "audio": audio,
            "output": args.output,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise result")?
        );
    } else {
        println!("{}", spoken.words);
        if !cli.quiet {
            eprintln!(
                "{}  {}  →  {}",
                green("✔"),
                dim(&format!("{} bytes", audio.len())),
                bold(&args.output.display().to_string())
            );
        }
    }
    Ok(())
}

async fn run_inspect(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let input = load_input(&args.input, cli.download_timeout)
        .await
        .context("Failed to read input")?;
    let meta = inspect(input.bytes, cli.pdfium_lib.clone(), args.password.clone())
        .await
        .context("Failed to inspect PDF")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
        );
    } else {
        println!("File:         {}", args.input);
        if let Some(ref t) = meta.title {
            println!("Title:        {}", t);
        }
        if let Some(ref a) = meta.author {
            println!("Author:       {}", a);
        }
        println!("Pages:        {}", meta.page_count);
        println!("Size:         {} bytes", meta.byte_len);
        if let Some(ref v) = meta.pdf_version {
            println!("PDF Version:  {}", v);
        }
        if let Some(ref p) = meta.producer {
            println!("Producer:     {}", p);
        }
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Map the shared PDF flags onto an extraction config builder.
fn extraction_config(
    cli: &Cli,
    source: &PdfSourceArgs,
    languages: OcrLanguages,
    batch_size: usize,
    default_span: Option<usize>,
    progress: Option<ProgressCallback>,
) -> Result<ocr_toolkit::ExtractionConfigBuilder> {
    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{} Stopping after the current page…", cyan("⚠"));
            on_signal.cancel();
        }
        // A second Ctrl-C stops immediately.
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let mut builder = ExtractionConfig::builder()
        .ocr_dpi(source.dpi)
        .native_text_threshold(source.text_threshold)
        .batch_size(batch_size)
        .languages(languages)
        .cancel_flag(cancel);

    if let Some(span) = default_span {
        builder = builder.default_span(span);
    }
    if let Some(ref pwd) = source.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    Ok(builder)
}

fn build_ocr(cli: &Cli) -> Result<Arc<dyn OcrEngine>> {
    let engine: Arc<dyn OcrEngine> = match cli.ocr_engine {
        OcrEngineArg::Tesseract => {
            let mut engine = TesseractCli::new().with_program(&cli.tesseract);
            if let Some(ref dir) = cli.tessdata_dir {
                engine = engine.with_tessdata_dir(dir);
            }
            // Text-layer pages never need tesseract, so a missing program is
            // only reported here and again on the pages that need it.
            if let Err(e) = engine.check_available() {
                warn!("{e}");
            }
            Arc::new(engine)
        }
        #[cfg(feature = "tesseract-native")]
        OcrEngineArg::TesseractNative => Arc::new(ocr_toolkit::TesseractNative {
            tessdata_dir: cli
                .tessdata_dir
                .as_ref()
                .map(|d| d.to_string_lossy().into_owned()),
        }),
        OcrEngineArg::Vision => {
            let config = VisionOcrConfig {
                provider_name: cli.vision_provider.clone(),
                model: cli.vision_model.clone(),
                ..VisionOcrConfig::default()
            };
            Arc::new(VisionOcr::from_config(config).context("Vision OCR unavailable")?)
        }
    };
    Ok(engine)
}

fn speech_config(args: &SpeechArgs) -> Result<SpeechConfig> {
    SpeechConfig::builder()
        .slow(args.slow)
        .timeout_secs(args.speech_timeout)
        .max_retries(args.speech_retries)
        .build()
        .context("Invalid speech configuration")
}

/// Write to a file, or to stdout when the path is "-".
async fn write_text(path: &Path, text: &str) -> Result<()> {
    if path == Path::new("-") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        return Ok(());
    }
    write_text_output(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn print_preview(text: &str) {
    let trimmed = text.trim_start();
    let preview: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    eprintln!("{}", dim("── preview ──"));
    eprintln!("{preview}");
    if trimmed.chars().count() > PREVIEW_CHARS {
        eprintln!("{}", dim("…"));
    }
    eprintln!("{}", dim("─────────────"));
}
