//! Subcommands and their execution against a ring.

use clap::Subcommand;
use corelib::partitioner::Partitioner;
use corelib::ring::HashRing;
use corelib::{Node, RingConfig};
use tracing::info;

/// Nodes used by the demonstration scenario.
const DEMO_NODES: [&str; 2] = ["10.0.0.1", "10.0.0.2"];
const DEMO_JOINER: &str = "10.0.0.3";
const DEMO_KEY: &str = "key0";

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add and remove 10.0.0.3 on a two-node ring and show where `key0` lands.
    Demo,
    /// Print the owner of each key.
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print membership, token count and per-node ownership.
    Stats,
    /// Add a node and report the fraction of sample keys that move.
    Churn {
        /// Address of the joining node.
        #[arg(long)]
        add: String,
        /// Number of `key{i}` samples.
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

/// Output of a command, one line per entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandResult {
    pub lines: Vec<String>,
}

impl CommandResult {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Run `command` against a ring built from `config`.
pub fn execute<P>(
    command: &Command,
    config: &RingConfig,
    partitioner: P,
) -> anyhow::Result<CommandResult>
where
    P: Partitioner,
{
    match command {
        Command::Demo => demo(config, partitioner),
        Command::Lookup { keys } => Ok(lookup(&config.build_with(partitioner)?, keys)),
        Command::Stats => Ok(stats(&config.build_with(partitioner)?)),
        Command::Churn { add, samples } => churn(&config.build_with(partitioner)?, add, *samples),
    }
}

fn owner_label(owner: Option<Node>) -> String {
    owner.map_or_else(|| "<no node>".to_string(), |node| node.to_string())
}

fn demo<P: Partitioner>(config: &RingConfig, partitioner: P) -> anyhow::Result<CommandResult> {
    let nodes = DEMO_NODES.iter().map(|addr| Node::new(*addr));
    let ring = HashRing::with_partitioner(config.vnodes_per_node, partitioner, nodes)?;
    let mut out = CommandResult::default();

    out.push(format!("{} -> {}", DEMO_KEY, owner_label(ring.get(DEMO_KEY))));

    let joiner = Node::new(DEMO_JOINER);
    let report = ring.add(joiner.clone());
    info!(
        node = %joiner,
        inserted = report.inserted,
        displaced = report.displaced,
        "demo node joined"
    );
    out.push(format!("added {}", joiner));
    out.push(format!("{} -> {}", DEMO_KEY, owner_label(ring.get(DEMO_KEY))));

    ring.remove(&joiner);
    out.push(format!("removed {}", joiner));
    out.push(format!("{} -> {}", DEMO_KEY, owner_label(ring.get(DEMO_KEY))));
    Ok(out)
}

fn lookup<P: Partitioner>(ring: &HashRing<Node, P>, keys: &[String]) -> CommandResult {
    let snapshot = ring.snapshot();
    let mut out = CommandResult::default();
    for key in keys {
        out.push(format!("{} -> {}", key, owner_label(snapshot.get(key))));
    }
    out
}

fn stats<P: Partitioner>(ring: &HashRing<Node, P>) -> CommandResult {
    let mut out = CommandResult::default();
    out.push(format!("partitioner: {}", ring.partitioner_name()));
    out.push(format!("vnodes per node: {}", ring.vnodes_per_node()));
    out.push(format!("nodes: {}", ring.node_count()));
    out.push(format!("tokens: {}", ring.token_count()));
    for (node, share) in ring.ownership() {
        out.push(format!("{}: {:.2}%", node, share * 100.0));
    }
    out
}

fn churn<P: Partitioner>(
    ring: &HashRing<Node, P>,
    joiner: &str,
    samples: usize,
) -> anyhow::Result<CommandResult> {
    let joiner = Node::parse(joiner)?;
    if ring.contains(&joiner) {
        anyhow::bail!("{} is already on the ring", joiner);
    }

    let keys: Vec<String> = (0..samples).map(|i| format!("key{}", i)).collect();
    let before = ring.snapshot();
    let report = ring.add(joiner.clone());
    let moved = keys.iter().filter(|k| before.get(k) != ring.get(k)).count();

    let mut out = CommandResult::default();
    let expected = 1.0 / ring.node_count() as f64;
    let observed = if samples == 0 { 0.0 } else { moved as f64 / samples as f64 };
    out.push(format!(
        "added {} ({} positions, {} collisions)",
        joiner,
        report.owned(),
        report.displaced
    ));
    out.push(format!("moved {} of {} keys ({:.2}%)", moved, samples, observed * 100.0));
    out.push(format!("expected about {:.2}%", expected * 100.0));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::partitioner::{Crc32Partitioner, Xxh3Partitioner};

    fn config(nodes: &[&str]) -> RingConfig {
        RingConfig {
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            ..RingConfig::default()
        }
    }

    #[test]
    fn test_demo_restores_owner() {
        let result = execute(&Command::Demo, &RingConfig::default(), Crc32Partitioner).unwrap();
        assert_eq!(result.lines.len(), 5);
        assert!(result.lines[0].starts_with("key0 -> 10.0.0."));
        assert_eq!(result.lines[1], "added 10.0.0.3");
        assert_eq!(result.lines[0], result.lines[4]);
    }

    #[test]
    fn test_lookup_on_empty_ring() {
        let command = Command::Lookup { keys: vec!["key0".into()] };
        let result = execute(&command, &config(&[]), Crc32Partitioner).unwrap();
        assert_eq!(result.lines, vec!["key0 -> <no node>"]);
    }

    #[test]
    fn test_stats_lists_every_node() {
        let result = execute(&Command::Stats, &config(&["a.1", "b.2"]), Xxh3Partitioner).unwrap();
        assert!(result.lines.contains(&"nodes: 2".to_string()));
        assert!(result.lines.contains(&"tokens: 400".to_string()));
        assert!(result.lines.iter().any(|l| l.starts_with("a.1: ")));
        assert!(result.lines.iter().any(|l| l.starts_with("b.2: ")));
    }

    #[test]
    fn test_churn_rejects_existing_member() {
        let command = Command::Churn { add: "a.1".into(), samples: 10 };
        assert!(execute(&command, &config(&["a.1"]), Crc32Partitioner).is_err());
    }

    #[test]
    fn test_churn_reports_moved_keys() {
        let command = Command::Churn { add: "c.3".into(), samples: 1_000 };
        let result = execute(&command, &config(&["a.1", "b.2"]), Xxh3Partitioner).unwrap();
        assert!(result.lines[1].starts_with("moved "));
        assert_eq!(result.lines[2], "expected about 33.33%");
    }
}
