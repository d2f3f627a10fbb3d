use clap::{Parser, Subcommand};
use palette::Srgba;
use ringchart::{
    Category, CategoryId, ChartOptions, Command, DonutChart, MotionMode, SOCKET_PATH, Selection,
};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ringchart", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the chart window.
    Show,
    /// Hide the chart window.
    Hide,
    /// Reload categories from the configuration file.
    Reload,
    /// Select a category by id.
    Select { id: String },
    /// Override the reduced-motion setting (system, reduced or full).
    Motion { mode: MotionMode },
    /// Print the computed ring layout for a list of values.
    Layout {
        /// Category values, in ring order
        #[arg(required = true)]
        values: Vec<f64>,

        /// Side of the square drawing area
        #[arg(short, long, default_value_t = 320.0)]
        size: f64,

        /// Index of the category to select
        #[arg(long)]
        select: Option<usize>,

        /// Alignment angle of the indicator, in radians
        #[arg(short, long, default_value_t = ringchart::DEFAULT_ALIGNMENT_ANGLE, allow_negative_numbers = true)]
        alignment: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command(&Command::Show),
        Commands::Hide => send_command(&Command::Hide),
        Commands::Reload => send_command(&Command::Reload),
        Commands::Select { id } => send_command(&Command::Select(CategoryId::new(id))),
        Commands::Motion { mode } => send_command(&Command::Motion(mode)),
        Commands::Layout {
            values,
            size,
            select,
            alignment,
        } => print_layout(&values, size, select, alignment),
    }
}

fn send_command(command: &Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to budgetring at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}

fn print_layout(
    values: &[f64],
    size: f64,
    select: Option<usize>,
    alignment: f64,
) -> anyhow::Result<()> {
    let categories = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Category::new(
                format!("c{i}"),
                format!("Category {i}"),
                *v,
                Srgba::new(0.5, 0.5, 0.5, 1.0),
                "folder",
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let initial = match select {
        Some(i) if i >= categories.len() => {
            anyhow::bail!("--select {} is out of range ({} values)", i, categories.len())
        }
        Some(i) => Some(categories[i].id().clone()),
        None => None,
    };

    let options = ChartOptions {
        size,
        reduced_motion: true,
        alignment_angle: alignment,
    };
    let mut chart = DonutChart::new(categories, initial.as_ref(), options, |v: f64| {
        format!("{v:.2}")
    });
    chart.tick(Duration::from_secs(1));

    println!("total    {:.4}", chart.total());
    println!(
        "radii    outer {:.2}  inner {:.2}  thickness {:.2}",
        chart.layout().outer_radius(),
        chart.layout().inner_radius(),
        chart.layout().thickness()
    );
    for wedge in chart.wedges() {
        println!(
            "[{}]{} start {:>8.4}  end {:>8.4}  sweep {:>7.4}  center {:>8.4}  r {:.2}..{:.2}",
            wedge.index,
            if wedge.selected { "*" } else { " " },
            wedge.range.start,
            wedge.range.end,
            wedge.range.sweep(),
            wedge.range.center(),
            wedge.inner_radius(),
            wedge.outer_radius()
        );
    }
    for label in chart.labels() {
        println!("label    {}{}", label.text, if label.selected { " (selected)" } else { "" });
    }

    match chart.selection() {
        Selection::Selected { index, .. } => {
            println!("rotation {:.4} rad (segment {})", chart.rotation_angle(), index)
        }
        Selection::Empty => println!("rotation none"),
    }
    println!("center   {}", chart.center_label());
    Ok(())
}
