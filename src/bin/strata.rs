//! This is the command line tool that loads '.lgf' files, places the graph,
//! and prints the coordinates of the vertices and the routes of the edges.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::process::exit;
use strata::core::base::LayoutDirection;
use strata::core::config::{EdgeRouting, LayoutConfig, PositionMode};
use strata::core::geometry::Point;
use strata::core::utils::save_to_file;
use strata::lgf::{dump_ast, GraphBuilder, LgfParser, NamedGraph};
use strata::topo::placer::{Layout, Placer};

struct CLIOptions {
    config: LayoutConfig,
    output_path: Option<String>,
    dump_ast: bool,
}

fn parse_options(matches: &ArgMatches) -> Result<CLIOptions, String> {
    let mut config = LayoutConfig::new();

    if let Some(dir) = matches.get_one::<String>("direction") {
        let dir: LayoutDirection = dir.parse().map_err(|e| format!("{}", e))?;
        config.set_direction(dir);
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        let mode: PositionMode = mode.parse().map_err(|e| format!("{}", e))?;
        config.set_position_mode(mode);
    }
    if let Some(routing) = matches.get_one::<String>("routing") {
        let routing: EdgeRouting =
            routing.parse().map_err(|e| format!("{}", e))?;
        config.set_edge_routing(routing);
    }
    if let Some(dist) = matches.get_one::<f64>("layer-distance") {
        config.set_layer_distance(*dist);
    }
    if let Some(dist) = matches.get_one::<f64>("vertex-distance") {
        config.set_vertex_distance(*dist);
    }
    config.set_validate(!matches.get_flag("no-validate"));

    Ok(CLIOptions {
        config,
        output_path: matches.get_one::<String>("output").cloned(),
        dump_ast: matches.get_flag("ast"),
    })
}

fn format_points(points: &[Point]) -> String {
    let strs: Vec<String> = points.iter().map(|p| p.to_string()).collect();
    strs.join(" ")
}

/// \returns the text report of the layout.
fn generate_report(named: &NamedGraph, layout: &Layout) -> String {
    let mut content = String::new();
    for (name, node) in named.nodes() {
        content.push_str(&format!("node {} {}\n", name, layout.position(*node)));
    }
    for (from, to, edge) in named.edges() {
        let points = layout.route(*edge).unwrap_or(&[]);
        content.push_str(&format!(
            "edge {} -> {}: {}\n",
            from,
            to,
            format_points(points)
        ));
    }
    content
}

fn main() {
    let matches = Command::new("strata")
        .version("0.1")
        .about("Assigns coordinates to layered graphs")
        .arg(
            Arg::new("direction")
                .short('d')
                .long("direction")
                .value_name("DIR")
                .help("The direction of the layers: tb, bt, lr or rl"),
        )
        .arg(
            Arg::new("layer-distance")
                .long("layer-distance")
                .value_name("DIST")
                .value_parser(clap::value_parser!(f64))
                .help("The gap between two layers"),
        )
        .arg(
            Arg::new("vertex-distance")
                .long("vertex-distance")
                .value_name("DIST")
                .value_parser(clap::value_parser!(f64))
                .help("The minimal gap between two vertices in a layer"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Use a single mode (0..3) or the average of all modes"),
        )
        .arg(
            Arg::new("routing")
                .short('r')
                .long("routing")
                .value_name("KIND")
                .help("The edge routing: traditional or orthogonal"),
        )
        .arg(
            Arg::new("ast")
                .short('a')
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Dump the graph AST"),
        )
        .arg(
            Arg::new("no-validate")
                .long("no-validate")
                .action(ArgAction::SetTrue)
                .help("Disable the checks of the placement"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let cli = match parse_options(&matches) {
        Ok(cli) => cli,
        Err(err) => {
            log::error!("{}", err);
            exit(1);
        }
    };

    let input_path = matches
        .get_one::<String>("INPUT")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let contents = match fs::read_to_string(input_path) {
        Ok(contents) => contents,
        Err(err) => {
            log::error!("Can't open the file {}: {}", input_path, err);
            exit(1);
        }
    };

    let mut parser = LgfParser::new(&contents);
    let tree = match parser.process() {
        Ok(tree) => tree,
        Err(err) => {
            parser.print_error();
            log::error!("Error: {}", err);
            exit(1);
        }
    };

    if cli.dump_ast {
        dump_ast(&tree);
    }

    let mut gb = GraphBuilder::new();
    if let Err(err) = gb.visit_graph(&tree) {
        log::error!("Error: {}", err);
        exit(1);
    }
    let mut named = gb.get();

    let layout = match Placer::new(&mut named.graph, cli.config).layout() {
        Ok(layout) => layout,
        Err(err) => {
            log::error!("Error: {}", err);
            exit(1);
        }
    };
    let content = generate_report(&named, &layout);

    match cli.output_path {
        Some(path) => {
            if let Err(err) = save_to_file(&path, &content) {
                log::error!("Could not write the file {}", path);
                log::error!("Error {}", err);
                exit(1);
            }
            log::info!("Wrote {}", path);
        }
        None => print!("{}", content),
    }
}
