use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use asmgraph::{AssemblyGraph, ContiguityStatus, DepthTag, GraphConfig, PackedSequence};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "asmgraph", about = "Inspect bidirected assembly graphs")]
struct Cli {
    /// Node table: `name<TAB>depth<TAB>sequence-or-*[<TAB>length]` per line.
    #[arg(long, global = true)]
    nodes: Option<PathBuf>,
    /// Edge table: `from<TAB>to[<TAB>overlap]` per line, signed node names.
    #[arg(long, global = true)]
    edges: Option<PathBuf>,
    /// Maximum path length walked when classifying contiguity.
    #[arg(long, global = true, default_value_t = 15)]
    search_steps: usize,
    /// FASTA line width (0 disables wrapping).
    #[arg(long, global = true, default_value_t = 70)]
    line_width: usize,
    /// Tag used for segment depth in GFA output.
    #[arg(long, global = true, value_enum, default_value_t = DepthTagArg::Dp)]
    depth_tag: DepthTagArg,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print node, edge, length and depth statistics.
    Summary,
    /// Classify every node by contiguity with a start node.
    Contiguity {
        /// Signed start node name, e.g. `5+`.
        node: String,
    },
    /// List nodes within a hop distance of a start node.
    Neighbourhood {
        /// Signed start node name.
        node: String,
        /// Maximum number of edges from the start node.
        #[arg(long, default_value_t = 1)]
        distance: usize,
    },
    /// Write the graph as GFA 1.
    Gfa,
    /// Write every segment as FASTA.
    Fasta {
        /// Also write the negative strand of each segment.
        #[arg(long)]
        both_strands: bool,
    },
    /// Print the reverse complement of a sequence file.
    Revcomp {
        /// Plain sequence or FASTA file.
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DepthTagArg {
    Dp,
    Kc,
    Rc,
    Fc,
}

impl From<DepthTagArg> for DepthTag {
    fn from(arg: DepthTagArg) -> Self {
        match arg {
            DepthTagArg::Dp => DepthTag::Dp,
            DepthTagArg::Kc => DepthTag::Kc,
            DepthTagArg::Rc => DepthTag::Rc,
            DepthTagArg::Fc => DepthTag::Fc,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GraphConfig::default()
        .with_contiguity_search_steps(cli.search_steps)
        .with_fasta_line_width(cli.line_width)
        .with_depth_tag(cli.depth_tag.into());

    match &cli.command {
        Commands::Summary => println!("{}", load_graph(&cli, config)?.summary()),
        Commands::Contiguity { node } => run_contiguity(load_graph(&cli, config)?, node)?,
        Commands::Neighbourhood { node, distance } => {
            run_neighbourhood(&load_graph(&cli, config)?, node, *distance)?
        }
        Commands::Gfa => print!("{}", load_graph(&cli, config)?.to_gfa()?),
        Commands::Fasta { both_strands } => run_fasta(&load_graph(&cli, config)?, *both_strands)?,
        Commands::Revcomp { file } => run_revcomp(file)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(cli: &Cli, config: GraphConfig) -> Result<AssemblyGraph> {
    let nodes_path = cli
        .nodes
        .as_ref()
        .ok_or_else(|| anyhow!("--nodes is required for this command"))?;

    let mut graph = AssemblyGraph::with_config(config);
    read_node_table(&mut graph, nodes_path)
        .with_context(|| format!("failed to load nodes from {}", nodes_path.display()))?;
    if let Some(edges_path) = &cli.edges {
        read_edge_table(&mut graph, edges_path)
            .with_context(|| format!("failed to load edges from {}", edges_path.display()))?;
    }
    graph.mark_all_drawn();
    graph.recalculate_relative_depths();

    info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");
    Ok(graph)
}

fn table_rows(path: &Path) -> Result<impl Iterator<Item = (usize, std::io::Result<String>)>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().enumerate())
}

fn read_node_table(graph: &mut AssemblyGraph, path: &Path) -> Result<()> {
    for (idx, line) in table_rows(path)? {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            bail!("line {}: expected at least 3 columns, found {}", idx + 1, fields.len());
        }

        let depth: f64 = fields[1]
            .parse()
            .with_context(|| format!("line {}: invalid depth '{}'", idx + 1, fields[1]))?;
        let sequence = if fields[2] == "*" {
            PackedSequence::empty()
        } else {
            fields[2]
                .parse::<PackedSequence>()
                .with_context(|| format!("line {}: invalid sequence", idx + 1))?
        };
        let length: u32 = match fields.get(3) {
            Some(value) => value
                .parse()
                .with_context(|| format!("line {}: invalid length '{}'", idx + 1, value))?,
            None => 0,
        };

        graph
            .add_node_pair_with_length(fields[0], depth, sequence, length)
            .with_context(|| format!("line {}", idx + 1))?;
    }
    Ok(())
}

fn read_edge_table(graph: &mut AssemblyGraph, path: &Path) -> Result<()> {
    for (idx, line) in table_rows(path)? {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            bail!("line {}: expected at least 2 columns, found {}", idx + 1, fields.len());
        }
        let overlap: u32 = match fields.get(2) {
            Some(value) => value
                .parse()
                .with_context(|| format!("line {}: invalid overlap '{}'", idx + 1, value))?,
            None => 0,
        };
        graph
            .add_edge_by_name(fields[0], fields[1], overlap)
            .with_context(|| format!("line {}", idx + 1))?;
    }
    Ok(())
}

fn resolve(graph: &AssemblyGraph, name: &str) -> Result<asmgraph::NodeId> {
    graph
        .find_node(name)
        .ok_or_else(|| anyhow!("no node named '{name}'"))
}

fn run_contiguity(mut graph: AssemblyGraph, name: &str) -> Result<()> {
    let start = resolve(&graph, name)?;
    graph
        .determine_contiguity(start)
        .with_context(|| format!("contiguity scan from {name} failed"))?;

    for status in [
        ContiguityStatus::Starting,
        ContiguityStatus::ContiguousStrandSpecific,
        ContiguityStatus::ContiguousEitherStrand,
        ContiguityStatus::MaybeContiguous,
        ContiguityStatus::NotContiguous,
    ] {
        for id in graph.nodes_with_contiguity(status) {
            if let Some(node) = graph.node(id) {
                println!("{}\t{:?}", node.signed_name(), status);
            }
        }
    }
    Ok(())
}

fn run_neighbourhood(graph: &AssemblyGraph, name: &str, distance: usize) -> Result<()> {
    let start = resolve(graph, name)?;
    let reached = graph.nodes_within_distance(start, distance)?;
    debug!(start = name, distance, reached = reached.len(), "neighbourhood");
    for (id, hops) in reached {
        if let Some(node) = graph.node(id) {
            println!("{}\t{}\t{}", node.signed_name(), hops, node.full_length());
        }
    }
    Ok(())
}

fn run_fasta(graph: &AssemblyGraph, both_strands: bool) -> Result<()> {
    let ids: Vec<_> = if both_strands {
        graph.nodes().map(|(id, _)| id).collect()
    } else {
        graph.positive_nodes().map(|(id, _)| id).collect()
    };
    for id in ids {
        print!("{}", graph.fasta_record(id, both_strands, true)?);
    }
    Ok(())
}

fn run_revcomp(path: &Path) -> Result<()> {
    let bases = read_sequence_file(path)
        .with_context(|| format!("failed to read sequence from {}", path.display()))?;
    let sequence = PackedSequence::new(&bases).context("sequence too long to pack")?;
    println!("{}", sequence.reverse_complement());
    Ok(())
}

fn read_sequence_file(path: &Path) -> Result<Vec<u8>> {
    let contents = std::fs::read_to_string(path)?;
    let sequence: String = contents
        .lines()
        .filter(|line| !line.starts_with('>') && !line.trim().is_empty())
        .map(str::trim)
        .collect();
    Ok(sequence.into_bytes())
}
