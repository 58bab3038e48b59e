//! Convert Lignum trees to VTK partitioned dataset collections
use clap::Parser;
use lignumvtk::container::DatasetSelector;
use lignumvtk::convert::{convert_file, list_file_datasets, ConversionOptions};
use lignumvtk::types::{Error, Result, SPLINE_RESOLUTION, TUBE_NUMBER_OF_SIDES};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Read a Lignum XML tree, or trees stored in a Lignum HDF5 file, and write a VTK
/// partitioned dataset collection.
///
/// Examples:
///   lignumvtk --input File.xml --output VTKFile.vtpc
///   lignumvtk --input File.h5 --list
///   lignumvtk --input File.h5 --output VTKFile.vtpc --year 20
///   lignumvtk --input File.h5 --output VTKFile.vtpc --dataset /TreeXML/60/Tree_8
#[derive(Parser, Debug, Clone)]
#[command(name = "lignumvtk", version, verbatim_doc_comment)]
struct Args {
    /// Input file, a Lignum XML tree (.xml) or a Lignum HDF5 file (.h5)
    #[arg(long)]
    input: PathBuf,

    /// List the tree datasets of an HDF5 file and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Output file (.vtpc, or .vtm for a multiblock dataset)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Convert all trees of a growth year from an HDF5 file
    #[arg(long, conflicts_with = "dataset")]
    year: Option<i32>,

    /// Convert the trees whose HDF5 dataset path contains this string
    #[arg(long)]
    dataset: Option<String>,

    /// Match --dataset as a suffix of the dataset path
    #[arg(long, default_value_t = false, requires = "dataset")]
    exact_match: bool,

    /// Centerline samples per axis point
    #[arg(long, default_value_t = SPLINE_RESOLUTION)]
    resolution: usize,

    /// Sides of the tube cross section
    #[arg(long, default_value_t = TUBE_NUMBER_OF_SIDES)]
    sides: usize,
}

impl Args {
    fn selector(&self) -> Option<DatasetSelector> {
        match (self.year, &self.dataset) {
            (Some(year), _) => Some(DatasetSelector::Year(year)),
            (None, Some(pattern)) => Some(DatasetSelector::Path {
                pattern: pattern.clone(),
                exact_match: self.exact_match,
            }),
            (None, None) => None,
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.list {
        let names = list_file_datasets(&args.input)?;
        for name in &names {
            println!("{name}");
        }
        println!("Total of {} trees", names.len());
        return Ok(());
    }
    let output = args
        .output
        .as_deref()
        .ok_or_else(|| Error::InputSelection(String::from("no output file")))?;
    let mut options = ConversionOptions::default();
    options.set_resolution(args.resolution);
    options.set_tube_sides(args.sides);
    let summary = convert_file(&args.input, args.selector().as_ref(), output, &options)?;
    info!("Converted {summary}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
