//! Flood a text map and print its costs and move directions
//!
//! Usage: flood_map <map.txt> [--goal x,y] [--closed]

use floodmaze::flood::FloodEngine;
use floodmaze::map_text::{self, View};
use floodmaze::wall::Mask;
use std::env;
use std::process;

struct Options {
    path: String,
    goal: Option<(usize, usize)>,
    mask: Mask,
}

fn parse_goal(value: &str) -> Option<(usize, usize)> {
    let (x, y) = value.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut path = None;
    let mut goal = None;
    let mut mask = Mask::Open;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--closed" => mask = Mask::Closed,
            "--goal" => {
                let value = iter.next().ok_or("--goal needs a value such as 7,7")?;
                goal = Some(parse_goal(value).ok_or_else(|| format!("bad goal {:?}, expected x,y", value))?);
            }
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => {
                if path.replace(other.to_string()).is_some() {
                    return Err("only one map file can be given".to_string());
                }
            }
        }
    }

    Ok(Options {
        path: path.ok_or("missing map file")?,
        goal,
        mask,
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("flood_map", String::as_str);
    let options = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: {} <map.txt> [--goal x,y] [--closed]", program);
            process::exit(2);
        }
    };

    let mut maze = match map_text::load_map_file(&options.path) {
        Ok(maze) => maze,
        Err(e) => {
            eprintln!("Failed to load {}: {}", options.path, e);
            process::exit(1);
        }
    };
    if let Some((x, y)) = options.goal {
        if x >= maze.size() || y >= maze.size() || !maze.set_goal(maze.cell_id(x, y)) {
            eprintln!("Goal ({}, {}) is outside the {}x{} maze", x, y, maze.size(), maze.size());
            process::exit(1);
        }
    }
    maze.set_mask(options.mask);

    let mut engine = FloodEngine::for_maze(&maze);
    engine.flood_to_goal(&maze);

    println!("=== {} ({}x{}, goal {:?}, {:?} mask) ===\n", options.path, maze.size(), maze.size(), maze.cell_xy(maze.goal()), options.mask);
    print!("{}", map_text::render(&maze, View::Plain, None));
    println!("\n=== Costs ===\n");
    print!("{}", map_text::render(&maze, View::Costs, Some(&engine)));
    println!("\n=== Directions ===\n");
    print!("{}", map_text::render(&maze, View::Directions, Some(&engine)));

    let field = engine.field();
    println!("\n=== Summary ===");
    println!("Cells reached: {} of {}", field.reached_count(), maze.cell_count());
    if field.is_reached(maze.start()) {
        println!("Start cost: {}", field.cost(maze.start()));
    } else {
        println!("Start cost: unreachable");
    }

    let possible = engine.speed_run_possible(&maze);
    println!("Speed run possible: {}", if possible { "yes" } else { "no" });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(&args(&["maze.txt", "--goal", "3,4", "--closed"])).unwrap();
        assert_eq!(options.path, "maze.txt");
        assert_eq!(options.goal, Some((3, 4)));
        assert_eq!(options.mask, Mask::Closed);

        let options = parse_args(&args(&["maze.txt"])).unwrap();
        assert_eq!(options.goal, None);
        assert_eq!(options.mask, Mask::Open);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
        assert!(parse_args(&args(&["a.txt", "--goal"])).is_err());
        assert!(parse_args(&args(&["a.txt", "--goal", "7"])).is_err());
        assert!(parse_args(&args(&["a.txt", "--fast"])).is_err());
    }
}
