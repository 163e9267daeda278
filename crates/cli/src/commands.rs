//! CLI commands.
//!
//! `simulate` drives a randomized population of members through
//! join/distribute/prune from parallel workers; `dump` prints the debug
//! report for a small canned scenario.

use anyhow::Context;
use clap::Subcommand;
use corelib::item::{ItemKind, ItemStack};
use corelib::member::{MemberId, NetworkMember, SimMember, TransferMode};
use corelib::network::NetworkId;
use directory::NetworkDirectory;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Output of a command, printed by the config runner.
pub struct CommandResult {
    pub report: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a randomized multi-network simulation and report the outcome.
    Simulate {
        /// Number of named networks.
        #[arg(long, default_value_t = 3)]
        networks: usize,
        /// Members spawned across the networks.
        #[arg(long, default_value_t = 12)]
        members: usize,
        /// Distribution rounds each worker runs.
        #[arg(long, default_value_t = 20)]
        ticks: usize,
        /// Milliseconds between rounds (0 = run flat out).
        #[arg(long, default_value_t = 0)]
        tick_ms: u64,
        /// RNG seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the debug dump of a small canned scenario.
    Dump,
}

impl Command {
    pub fn execute(self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Simulate {
                networks,
                members,
                ticks,
                tick_ms,
                seed,
            } => simulate(networks, members, ticks, tick_ms, seed),
            Command::Dump => dump(),
        }
    }
}

fn item_kinds() -> Vec<ItemKind> {
    vec![
        ItemKind::new("ingot", 64),
        ItemKind::new("gem", 16),
        ItemKind::new("dust", 64),
    ]
}

fn simulate(
    networks: usize,
    members: usize,
    ticks: usize,
    tick_ms: u64,
    seed: Option<u64>,
) -> anyhow::Result<CommandResult> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);
    let dir = Arc::new(NetworkDirectory::new());

    let names: Vec<String> = (0..networks.max(1))
        .map(|i| format!("network-{}", i))
        .collect();

    // spawn the population and scatter it across the networks
    let mut population: Vec<(NetworkId, Arc<SimMember>)> = Vec::with_capacity(members);
    for i in 0..members {
        let max = 500 + rng.gen_range(0..1_500u64);
        let member = Arc::new(SimMember::new(
            MemberId(i as u128 + 1),
            format!("member-{}", i),
            max,
        ));
        member.set_stored_energy(rng.gen_range(0..=max));
        member.set_mode(match rng.gen_range(0..3) {
            0 => TransferMode::SendOnly,
            1 => TransferMode::ReceiveOnly,
            _ => TransferMode::SendReceive,
        });
        let name = &names[rng.gen_range(0..names.len())];
        let id = dir.join_network(name, member.clone());
        population.push((id, member));
    }
    info!(members, networks = names.len(), seed, "population joined");

    // parallel workers, each driving its share of the population
    let worker_count = population.len().clamp(1, 4);
    let chunk = population.len().div_ceil(worker_count);
    let shares: Vec<Vec<(NetworkId, Arc<SimMember>)>> = population
        .chunks(chunk.max(1))
        .map(|share| share.to_vec())
        .collect();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building simulation runtime")?;
    runtime.block_on(async {
        let kinds = item_kinds();
        let mut tasks = Vec::new();
        for (worker, share) in shares.into_iter().enumerate() {
            let dir = Arc::clone(&dir);
            let kinds = kinds.clone();
            let mut rng = SmallRng::seed_from_u64(seed ^ (worker as u64 + 1));
            tasks.push(tokio::spawn(async move {
                for _ in 0..ticks {
                    for (net_id, member) in &share {
                        run_member_tick(&dir, *net_id, member.as_ref(), &kinds, &mut rng);
                    }
                    if tick_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(tick_ms)).await;
                    }
                }
            }));
        }
        for task in tasks {
            let _ = task.await;
        }
    });

    // retire a slice of the population, then sweep
    let mut invalidated = 0;
    for (_, member) in &population {
        if rng.gen_bool(0.15) {
            member.invalidate();
            invalidated += 1;
        }
    }
    let pruned = dir.prune_empty();
    let records = dir.serialize_records();
    let stats = dir.statistics();

    let mut report = String::new();
    let _ = writeln!(report, "Simulation complete (seed {})", seed);
    let _ = writeln!(
        report,
        "  networks:  {} requested, {} live after prune",
        names.len(),
        dir.network_count()
    );
    let _ = writeln!(
        report,
        "  members:   {} spawned, {} invalidated",
        members, invalidated
    );
    let _ = writeln!(report, "  pruned:    {} empty networks", pruned);
    let _ = writeln!(report, "  snapshot:  {} records", records.len());
    let _ = writeln!(
        report,
        "  energy:    {} / {} ({:.1}%)",
        stats.total_stored_energy,
        stats.total_max_energy,
        stats.fill_percent()
    );
    report.push('\n');
    report.push_str(&dir.debug_dump());

    Ok(CommandResult { report })
}

/// One member's turn: push or pull energy through its network, sometimes
/// push a small item batch. Unplaced energy flows back to the member.
fn run_member_tick(
    dir: &NetworkDirectory,
    net_id: NetworkId,
    member: &SimMember,
    kinds: &[ItemKind],
    rng: &mut SmallRng,
) {
    let mode = member.mode();
    if mode.can_send() {
        let drawn = member.extract_energy(rng.gen_range(10..120));
        if drawn > 0 {
            match dir.lookup(net_id) {
                Some(net) => {
                    let placed = net.distribute_energy(member.id(), drawn);
                    member.insert_energy(drawn - placed);
                }
                None => {
                    member.insert_energy(drawn);
                }
            }
        }
        if rng.gen_bool(0.3) {
            if let Some(net) = dir.lookup(net_id) {
                let kind = kinds[rng.gen_range(0..kinds.len())].clone();
                let batch = ItemStack::new(kind, rng.gen_range(1..=24));
                let _leftover = net.distribute_items(member.id(), batch);
            }
        }
    }
    if mode.can_receive() && rng.gen_bool(0.5) {
        if let Some(net) = dir.lookup(net_id) {
            let received = net.request_energy(member.id(), rng.gen_range(10..120));
            member.insert_energy(received);
        }
    }
}

fn dump() -> anyhow::Result<CommandResult> {
    let dir = NetworkDirectory::new();

    let alpha = dir.resolve_or_create("alpha");
    let a = Arc::new(SimMember::new(MemberId(1), "alpha-low", 100));
    a.set_stored_energy(10);
    let b = Arc::new(SimMember::new(MemberId(2), "alpha-high", 100));
    b.set_stored_energy(90);
    dir.add_member(alpha, a.clone());
    dir.add_member(alpha, b);

    if let Some(net) = dir.lookup(alpha) {
        net.distribute_energy(a.id(), 50);
    }

    let beta = dir.resolve_or_create("beta");
    let c = Arc::new(SimMember::new(MemberId(3), "beta-store", 200));
    c.set_stored_energy(200);
    c.set_slot(0, Some(ItemStack::new(ItemKind::new("ingot", 64), 32)))?;
    dir.add_member(beta, c);

    Ok(CommandResult {
        report: dir.debug_dump(),
    })
}
