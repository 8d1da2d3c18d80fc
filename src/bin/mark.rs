use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use make_your_mark::image_io::DEFAULT_OUTPUT_FILE;
use make_your_mark::text::FONT_ENV_VAR;
use make_your_mark::{CompositedImage, Compositor, Error, Placement, Session, TextColor};

#[derive(Parser)]
#[command(
    name = "mark",
    about = "Stamp a semi-transparent image or text watermark onto a photo",
    version,
    after_help = "Any value not given as a flag is asked for interactively.\n\n\
                  Example: mark -i photo.jpg -t \"(c) 2026\" -c black -p bottom-right"
)]
struct Cli {
    /// Base image to watermark
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Image to use as the watermark
    #[arg(short, long, conflicts_with = "text")]
    watermark: Option<PathBuf>,

    /// Text to use as the watermark
    #[arg(short, long)]
    text: Option<String>,

    /// Text color: white or black
    #[arg(short, long, requires = "text")]
    color: Option<TextColor>,

    /// Placement: center, top-left, top-right, bottom-left, bottom-right
    #[arg(short, long)]
    placement: Option<String>,

    /// Font file for text watermarks (default: a system font)
    #[arg(long, env = FONT_ENV_VAR)]
    font: Option<PathBuf>,

    /// Output file (png, bmp or tiff)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let interactive = io::stdin().is_terminal();

    let compositor = match Compositor::from_font_path(cli.font.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(&format!("Fatal: Failed to load font: {e}")),
    };

    let mut session = Session::new();

    // Step 1: base image
    match &cli.image {
        Some(path) => or_fail(session.load_base(path)),
        None => {
            require_interactive(interactive, "--image");
            ask("Step 1. Path to your image: ", |answer| {
                session.load_base(Path::new(answer))
            });
        }
    }
    step_done(&cli, "Image loaded");

    // Step 2: watermark image or text
    if let Some(path) = &cli.watermark {
        or_fail(session.load_watermark_image(path));
    } else if let Some(text) = &cli.text {
        require_font(&compositor);
        or_fail(session.set_text(text, cli.color.unwrap_or_default()));
    } else {
        require_interactive(interactive, "--watermark or --text");
        ask(
            "Step 2a. Path to your watermark image (leave blank to use text): ",
            |answer| {
                if answer.is_empty() {
                    return Ok(());
                }
                session.load_watermark_image(Path::new(answer))
            },
        );
        if session.watermark().is_none() {
            require_font(&compositor);
            let color = ask("Step 2b. Text color, white or black [white]: ", |answer| {
                if answer.is_empty() {
                    Ok(TextColor::default())
                } else {
                    answer.parse::<TextColor>()
                }
            });
            ask("Step 2b. Watermark text: ", |answer| {
                session.set_text(answer, color)
            });
        }
    }
    step_done(&cli, "Watermark chosen");

    // Step 3: placement
    match &cli.placement {
        Some(name) => or_fail(session.set_placement_named(name)),
        None => {
            require_interactive(interactive, "--placement");
            let choices = Placement::ALL.map(Placement::label).join(", ");
            ask(
                &format!("Step 3. Where would you like your mark? [{choices}]: "),
                |answer| session.set_placement_named(answer),
            );
        }
    }

    // Step 4: mark and export
    let marked = match session.mark(&compositor) {
        Ok(m) => m,
        Err(e) => fail(&format!("Error: {e}")),
    };
    if let Err(e) = marked.save(&cli.output) {
        fail(&format!("Error: Failed to save {}: {e}", cli.output.display()));
    }
    print_result(&cli, &marked);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Prompt until `attempt` accepts the answer. Exits on end of input.
fn ask<T>(question: &str, mut attempt: impl FnMut(&str) -> make_your_mark::Result<T>) -> T {
    let stdin = io::stdin();
    loop {
        eprint!("{question}");

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => fail("Error: input closed"),
            Ok(_) => {}
            Err(e) => fail(&format!("Error: failed to read input: {e}")),
        }

        match attempt(line.trim_end_matches(['\r', '\n'])) {
            Ok(value) => return value,
            Err(e) => eprintln!("Error: {e}. Please try again."),
        }
    }
}

fn require_interactive(interactive: bool, flag: &str) {
    if !interactive {
        fail(&format!("Error: {flag} is required when input is not a terminal"));
    }
}

fn require_font(compositor: &Compositor) {
    if !compositor.has_font() {
        fail(&format!("Error: {}", Error::FontUnavailable));
    }
}

fn or_fail(result: make_your_mark::Result<()>) {
    if let Err(e) = result {
        fail(&format!("Error: {e}"));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn step_done(cli: &Cli, message: &str) {
    if !cli.quiet {
        eprintln!("[OK] {message}");
    }
}

fn print_result(cli: &Cli, marked: &CompositedImage) {
    if cli.quiet {
        return;
    }

    let (mw, mh) = marked.mark_size();
    let (x, y) = marked.origin();
    eprintln!(
        "[OK] Saved {} ({}, {mw}x{mh} mark at {x},{y})",
        cli.output.display(),
        marked.placement()
    );
    if cli.verbose {
        let (w, h) = marked.dimensions();
        eprintln!("  -> output {w}x{h}");
    }
}
