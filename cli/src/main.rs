//! docxstyle CLI - table and text formatting for Word documents

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use docxstyle::tools::{
    AlternatingRowsRequest, CellShadingRequest, CreateStyleRequest, FormatTableRequest,
    FormatTextRequest, HeaderHighlightRequest,
};
use docxstyle::{
    BorderMode, Document, FailurePolicy, FormatOptions, SplitMode, ToolOutput, ToolRequest, Toolbox,
};

#[derive(Parser)]
#[command(name = "docxstyle")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Format tables and text in Word (.docx) documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Engine behavior switches shared by every editing command.
#[derive(Args)]
struct EngineFlags {
    /// Keep going when a table cell fails instead of rolling back
    #[arg(long, global = true, env = "DOCXSTYLE_BEST_EFFORT")]
    best_effort: bool,

    /// Rebuild formatted paragraphs as plain prefix / target / suffix runs
    #[arg(long, global = true, env = "DOCXSTYLE_FLATTEN_RUNS")]
    flatten_runs: bool,

    /// Append border edges instead of replacing existing ones
    #[arg(long, global = true, env = "DOCXSTYLE_ACCUMULATE_BORDERS")]
    accumulate_borders: bool,

    /// Table border width in eighths of a point
    #[arg(long, global = true, default_value = "4", env = "DOCXSTYLE_BORDER_SIZE")]
    border_size: u32,
}

impl From<&EngineFlags> for FormatOptions {
    fn from(flags: &EngineFlags) -> Self {
        let mut options = FormatOptions::new().with_border_size(flags.border_size);
        if flags.best_effort {
            options = options.with_failure_policy(FailurePolicy::BestEffort);
        }
        if flags.flatten_runs {
            options = options.with_split_mode(SplitMode::Flatten);
        }
        if flags.accumulate_borders {
            options = options.with_border_mode(BorderMode::Accumulate);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Format a character range within a paragraph
    FormatText {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Paragraph index (0-based)
        #[arg(short, long)]
        paragraph: i64,

        /// Start position (inclusive)
        #[arg(long)]
        start: i64,

        /// End position (exclusive)
        #[arg(long)]
        end: i64,

        #[command(flatten)]
        font: FontArgs,

        /// Underline on/off
        #[arg(long)]
        underline: Option<bool>,
    },

    /// Create a custom paragraph style
    CreateStyle {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Style name
        #[arg(short, long)]
        name: String,

        /// Existing style to base this one on
        #[arg(long)]
        base: Option<String>,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Apply header bolding, borders and shading to a table
    FormatTable {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Table index (0-based)
        #[arg(short, long)]
        table: i64,

        /// Bold the first row
        #[arg(long)]
        header: bool,

        /// Border style
        #[arg(long, value_enum)]
        borders: Option<BorderArg>,

        /// Shading grid as JSON, e.g. '[["D9E2F3","FFFFFF"]]'
        #[arg(long)]
        shading: Option<String>,
    },

    /// Shade a single table cell
    ShadeCell {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Table index (0-based)
        #[arg(short, long)]
        table: i64,

        /// Row index (0-based)
        #[arg(short, long)]
        row: i64,

        /// Column index (0-based)
        #[arg(short, long)]
        col: i64,

        /// Fill color (hex)
        #[arg(short, long)]
        fill: String,

        /// Shading pattern (clear, solid, pct10, ...)
        #[arg(long, default_value = "clear")]
        pattern: String,
    },

    /// Shade table rows in alternating colors
    #[command(alias = "stripe")]
    AlternateRows {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Table index (0-based)
        #[arg(short, long)]
        table: i64,

        /// Color of even rows (0, 2, ...)
        #[arg(long, default_value = "FFFFFF")]
        even: String,

        /// Color of odd rows (1, 3, ...)
        #[arg(long, default_value = "F2F2F2")]
        odd: String,
    },

    /// Highlight a table's header row
    HighlightHeader {
        /// Word document
        #[arg(value_name = "FILE")]
        input: String,

        /// Table index (0-based)
        #[arg(short, long)]
        table: i64,

        /// Header background color (hex)
        #[arg(long, default_value = "4472C4")]
        color: String,

        /// Header text color (hex or "auto")
        #[arg(long, default_value = "FFFFFF")]
        text_color: String,
    },

    /// Run a JSON tool request
    Apply {
        /// Request file (stdin if not specified)
        #[arg(value_name = "REQUEST")]
        request: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Word document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Create a blank document
    New {
        /// Output file
        #[arg(value_name = "FILE")]
        output: PathBuf,

        /// Add a table of ROWSxCOLS (e.g., "3x4")
        #[arg(long, value_name = "ROWSxCOLS")]
        table: Option<String>,

        /// Add a paragraph with this text
        #[arg(long)]
        text: Vec<String>,
    },

    /// Show version information
    Version,
}

/// Font options shared by text and style commands.
#[derive(Args)]
struct FontArgs {
    /// Bold on/off
    #[arg(long)]
    bold: Option<bool>,

    /// Italic on/off
    #[arg(long)]
    italic: Option<bool>,

    /// Text color (name or hex)
    #[arg(long)]
    color: Option<String>,

    /// Font size in points
    #[arg(long)]
    size: Option<i64>,

    /// Font family
    #[arg(long)]
    font: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BorderArg {
    /// No borders
    None,
    /// Single line
    Single,
    /// Double line
    Double,
    /// Thick line
    Thick,
}

impl BorderArg {
    fn keyword(self) -> &'static str {
        match self {
            BorderArg::None => "none",
            BorderArg::Single => "single",
            BorderArg::Double => "double",
            BorderArg::Thick => "thick",
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let toolbox = Toolbox::with_options(FormatOptions::from(&cli.engine));

    let result = match cli.command {
        Some(Commands::FormatText {
            input,
            paragraph,
            start,
            end,
            font,
            underline,
        }) => {
            let mut request = FormatTextRequest::new(input, paragraph, start, end);
            request.bold = font.bold;
            request.italic = font.italic;
            request.underline = underline;
            request.color = font.color;
            request.font_size = font.size.map(Into::into);
            request.font_name = font.font;
            report(toolbox.format_text(&request))
        }
        Some(Commands::CreateStyle {
            input,
            name,
            base,
            font,
        }) => {
            let mut request = CreateStyleRequest::new(input, name);
            request.bold = font.bold;
            request.italic = font.italic;
            request.color = font.color;
            request.font_size = font.size.map(Into::into);
            request.font_name = font.font;
            request.base_style = base;
            report(toolbox.create_custom_style(&request))
        }
        Some(Commands::FormatTable {
            input,
            table,
            header,
            borders,
            shading,
        }) => cmd_format_table(&toolbox, input, table, header, borders, shading.as_deref()),
        Some(Commands::ShadeCell {
            input,
            table,
            row,
            col,
            fill,
            pattern,
        }) => report(
            toolbox.set_table_cell_shading(
                &CellShadingRequest::new(input, table, row, col, fill).pattern(pattern),
            ),
        ),
        Some(Commands::AlternateRows {
            input,
            table,
            even,
            odd,
        }) => report(
            toolbox.apply_table_alternating_rows(
                &AlternatingRowsRequest::new(input, table).colors(even, odd),
            ),
        ),
        Some(Commands::HighlightHeader {
            input,
            table,
            color,
            text_color,
        }) => report(
            toolbox.highlight_table_header(
                &HeaderHighlightRequest::new(input, table).colors(color, text_color),
            ),
        ),
        Some(Commands::Apply { request }) => cmd_apply(&toolbox, request.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::New {
            output,
            table,
            text,
        }) => cmd_new(&output, table.as_deref(), &text),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docxstyle <COMMAND> [OPTIONS]".yellow());
            println!("       docxstyle --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Print a tool outcome; a failed tool becomes an error.
fn report(output: ToolOutput) -> Result<(), Box<dyn std::error::Error>> {
    if output.success {
        println!("{} {}", "✓".green().bold(), output.message);
        Ok(())
    } else {
        Err(output.message.into())
    }
}

fn cmd_format_table(
    toolbox: &Toolbox,
    input: String,
    table: i64,
    header: bool,
    borders: Option<BorderArg>,
    shading: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = FormatTableRequest::new(input, table).header_row(header);
    if let Some(style) = borders {
        request = request.border_style(style.keyword());
    }
    if let Some(json) = shading {
        let grid: Vec<Vec<String>> =
            serde_json::from_str(json).map_err(|e| format!("Invalid shading grid: {}", e))?;
        request = request.shading(grid);
    }
    report(toolbox.format_table(&request))
}

fn cmd_apply(toolbox: &Toolbox, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request: ToolRequest =
        serde_json::from_str(&json).map_err(|e| format!("Invalid request: {}", e))?;
    println!("{} {}", "Running".cyan(), request.name());
    report(toolbox.dispatch(&request))
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = docxstyle::detect_format_from_path(input)?;
    let mut doc = Document::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!(
        "{}: {}",
        "Styles".bold(),
        if doc.has_styles() {
            doc.styles().len().to_string()
        } else {
            "none".to_string()
        }
    );

    if doc.table_count() > 0 {
        println!();
        println!("{}", "Tables".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (i, table) in doc.tables().enumerate() {
            println!(
                "  {} #{}: {} rows x {} columns",
                "├─".dimmed(),
                i,
                table.row_count(),
                table.column_count()
            );
        }
    }

    Ok(())
}

fn cmd_new(output: &Path, table: Option<&str>, text: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::new();
    for paragraph in text {
        doc.add_paragraph(paragraph);
    }

    if let Some(spec) = table {
        let (rows, cols) = spec
            .split_once(['x', 'X'])
            .and_then(|(r, c)| Some((r.trim().parse::<usize>().ok()?, c.trim().parse::<usize>().ok()?)))
            .ok_or_else(|| format!("Invalid table size '{}', expected ROWSxCOLS", spec))?;
        doc.add_table(rows, cols);
    }

    doc.save(output)?;
    println!("{} {}", "Created".green(), output.display());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docxstyle".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Table and text formatting for Word documents");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docxstyle".dimmed());
    println!("License: MIT");
}
