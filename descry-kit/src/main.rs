use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rug::Integer;
use tracing_subscriber::EnvFilter;

use descry::rotation::RecursionOptions;
use descry::types::{Matrix, Tag};
use descry::{Enumeration, VertexGroup};
use descry_kit::InputFile;
use descry_kit::format;

#[derive(Parser)]
#[command(name = "descry")]
#[command(about = "Convert between the vertex and facet descriptions of a polyhedron")]
struct Cmd {
    /// Input file (native or PORTA dialect, detected from the content)
    file: PathBuf,

    /// Conversion method
    #[arg(short = 'm', long = "method", value_enum, default_value = "ad")]
    method: Method,

    /// Worker thread count (default: available parallelism)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Recursive ridge discovery depth
    #[arg(short = 'r', long = "recursion-depth", default_value_t = 0)]
    recursion_depth: usize,

    /// Minimum number of vertices on a facet before recursing
    #[arg(long = "recursion-min-vertices", default_value_t = 0)]
    recursion_min_vertices: usize,

    /// Inner recursive enumerations expand only their seed facet
    #[arg(long)]
    sampling: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Method {
    /// Adjacency decomposition
    Ad,
    /// Direct double description
    Dd,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = Cmd::parse();
    let text = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("cannot read {}", cmd.file.display()))?;
    let input: InputFile<Integer> = format::parse(&text)?;

    let threads = cmd.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    });
    let recursion = RecursionOptions {
        depth: cmd.recursion_depth,
        min_vertices: cmd.recursion_min_vertices,
        sampling: cmd.sampling,
    };

    if !input.vertices.is_empty() {
        facet_enumeration(&input, cmd.method, threads, recursion)
    } else if !input.inequalities.is_empty() {
        vertex_enumeration(&input, cmd.method, threads, recursion)
    } else {
        bail!("input contains neither vertices nor inequalities");
    }
}

fn facet_enumeration(
    input: &InputFile<Integer>,
    method: Method,
    threads: usize,
    recursion: RecursionOptions,
) -> Result<()> {
    let group = if input.vertex_permutations.is_empty() {
        VertexGroup::from_maps(&input.maps, &input.vertices)
    } else {
        Some(VertexGroup::new(
            input.vertex_permutations.clone(),
            input.vertices.len(),
        )?)
    };
    tracing::info!(
        vertices = input.vertices.len(),
        dimension = input.dimension(),
        symmetric = group.is_some(),
        "facet enumeration"
    );

    println!("Inequalities:");
    let mut enumeration = Enumeration::new(&input.vertices, Tag::Facet)
        .with_names(input.names.clone())
        .with_maps(&input.maps)
        .with_seeds(input.inequalities.clone())
        .with_threads(threads)
        .with_recursion(recursion);
    if let Some(group) = &group {
        enumeration = enumeration.with_group(group);
    }
    run(enumeration, method)
}

fn vertex_enumeration(
    input: &InputFile<Integer>,
    method: Method,
    threads: usize,
    recursion: RecursionOptions,
) -> Result<()> {
    tracing::info!(
        inequalities = input.inequalities.len(),
        dimension = input.dimension(),
        "vertex enumeration"
    );

    // The homogenizing coordinate is itself constrained non-negative.
    let mut rows: Matrix<Integer> = input.inequalities.clone();
    let mut nonnegative = vec![Integer::new(); input.dimension() + 1];
    nonnegative[0] = Integer::from(1);
    rows.push(nonnegative);

    match method {
        Method::Ad => println!("Vertices / Rays:"),
        Method::Dd => println!("Vertices:"),
    }
    let enumeration = Enumeration::new(&rows, Tag::Vertex)
        .with_names(input.names.clone())
        .with_maps(&input.maps)
        .with_threads(threads)
        .with_recursion(recursion);
    run(enumeration, method)
}

fn run(enumeration: Enumeration<'_, Integer>, method: Method) -> Result<()> {
    let sink = Box::new(std::io::stdout());
    match method {
        Method::Ad => enumeration.run_adjacency(sink)?,
        Method::Dd => enumeration.run_double_description(sink)?,
    };
    Ok(())
}
