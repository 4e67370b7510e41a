//! Indexer verification harness.
//!
//! Prints table sizes, the preflop index grid, and runs exhaustive or
//! randomized consistency checks against any round schedule.
//!
//! Example: `check random 2,3,1,1 --samples 1000000`

use clap::Parser;
use clap::Subcommand;
use hand_index::Arbitrary;
use hand_index::cards::Card;
use hand_index::cards::Deck;
use hand_index::cards::Hand;
use hand_index::cards::Permutation;
use hand_index::cards::Rank;
use hand_index::cards::Street;
use hand_index::cards::Suit;
use hand_index::index::HandIndexer;
use hand_index::index::Recall;
use hand_index::index::Schedule;
use hand_index::index::StreetIndexer;
use hand_index::index::cache;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Largest hand the exhaustive check will enumerate.
const MAX_FULL_CARDS: usize = 7;

#[derive(Parser)]
#[command(author, version, about = "Verify suit-isomorphic hand indexers", long_about = None)]
struct Args {
    #[arg(short, long, global = true, help = "Log table construction")]
    verbose: bool,
    #[command(subcommand)]
    check: Check,
}

#[derive(Subcommand)]
enum Check {
    #[command(about = "Round sizes and table counts of a schedule", alias = "sz")]
    Sizes {
        #[arg(required = true)]
        schedule: String,
    },
    #[command(about = "Preflop index grid, suited above the diagonal")]
    Table,
    #[command(about = "Index every ordered deal, then round-trip every index")]
    Full {
        #[arg(required = true)]
        schedule: String,
    },
    #[command(about = "Relabeled and reshuffled deals must index alike", alias = "rng")]
    Random {
        #[arg(required = true)]
        schedule: String,
        #[arg(short, long, default_value_t = 1_000_000)]
        samples: usize,
    },
    #[command(about = "Index a hand after every round", alias = "idx")]
    Index {
        #[arg(required = true)]
        schedule: String,
        #[arg(required = true)]
        cards: String,
    },
    #[command(about = "Canonical hand of an index", alias = "inv")]
    Unindex {
        #[arg(required = true)]
        schedule: String,
        #[arg(required = true)]
        round: usize,
        #[arg(required = true)]
        index: u64,
    },
    #[command(about = "Per-street sizes of a recall preset")]
    Recall {
        #[arg(required = true)]
        recall: String,
        #[arg(long, default_value_t = 2)]
        hole: u8,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    hand_index::log(args.verbose);
    match args.check {
        Check::Sizes { schedule } => sizes(&*indexer(&schedule)?),
        Check::Table => table(&*indexer("2")?),
        Check::Full { schedule } => full(&*indexer(&schedule)?),
        Check::Random { schedule, samples } => random(&*indexer(&schedule)?, samples),
        Check::Index { schedule, cards } => {
            let indexer = indexer(&schedule)?;
            let cards = Card::parse(&cards).map_err(|e| anyhow::anyhow!(e))?;
            for (round, index) in indexer.index_all(&cards)?.into_iter().enumerate() {
                println!("round {}: {}", round, index);
            }
            Ok(())
        }
        Check::Unindex {
            schedule,
            round,
            index,
        } => Ok(println!("{}", indexer(&schedule)?.unindex(round, index)?)),
        Check::Recall { recall, hole } => {
            let recall = Recall::try_from(recall.as_str()).map_err(|e| anyhow::anyhow!(e))?;
            let indexer = StreetIndexer::new(hole, recall)?;
            for street in Street::all() {
                println!("{:<8} {:>14}", street, indexer.size(street));
            }
            Ok(())
        }
    }
}

fn indexer(schedule: &str) -> anyhow::Result<std::sync::Arc<HandIndexer>> {
    let schedule = Schedule::try_from(schedule)?;
    Ok(cache::indexer(&schedule)?)
}

fn sizes(indexer: &HandIndexer) -> anyhow::Result<()> {
    println!("{:>6} {:>14} {:>15} {:>13}", "round", "size", "configurations", "permutations");
    for round in 0..indexer.rounds() {
        println!(
            "{:>6} {:>14} {:>15} {:>13}",
            round,
            indexer.size(round),
            indexer.configurations(round),
            indexer.permutations(round)
        );
    }
    Ok(())
}

fn table(indexer: &HandIndexer) -> anyhow::Result<()> {
    let ranks = Rank::all().into_iter().rev().collect::<Vec<_>>();
    print!(" ");
    ranks.iter().for_each(|r| print!("  {} ", r));
    println!();
    for (i, hi) in ranks.iter().enumerate() {
        print!("{}", hi);
        for (j, lo) in ranks.iter().enumerate() {
            let suit = match j <= i {
                true => Suit::D,
                false => Suit::C,
            };
            let cards = [Card::from((*lo, Suit::C)), Card::from((*hi, suit))];
            print!(" {:>3}", indexer.index_last(&cards)?);
        }
        println!();
    }
    Ok(())
}

fn full(indexer: &HandIndexer) -> anyhow::Result<()> {
    let n = indexer.schedule().len();
    anyhow::ensure!(n <= MAX_FULL_CARDS, "{} cards is too many to enumerate", n);
    let last = indexer.rounds() - 1;
    let size = indexer.size(last);
    let deals = (0..n as u64).map(|i| 52 - i).product::<u64>();
    log::info!("indexing {} ordered deals into {} classes", deals, size);
    let seen = (0..size).map(|_| AtomicBool::new(false)).collect::<Vec<_>>();
    (0..deals).into_par_iter().try_for_each(|p| {
        let cards = nth_deal(p, n);
        let index = indexer.index_last(&cards)?;
        anyhow::ensure!(index < size, "{} indexed out of range: {}", show(&cards), index);
        seen[index as usize].store(true, Ordering::Relaxed);
        Ok(())
    })?;
    let missed = seen.iter().filter(|s| !s.load(Ordering::Relaxed)).count();
    anyhow::ensure!(missed == 0, "{} indices never hit", missed);
    log::info!("round-tripping {} indices", size);
    (0..size).into_par_iter().try_for_each(|index| {
        let deal = indexer.unindex(last, index)?;
        let again = indexer.index_last(deal.cards())?;
        anyhow::ensure!(again == index, "{} unindexed to {} which indexes to {}", index, deal, again);
        Ok(())
    })?;
    println!("full check passed: {} deals, {} classes", deals, size);
    Ok(())
}

fn random(indexer: &HandIndexer, samples: usize) -> anyhow::Result<()> {
    let n = indexer.schedule().len();
    let last = indexer.rounds() - 1;
    let size = indexer.size(last);
    log::info!("checking {} random deals", samples);
    (0..samples).into_par_iter().try_for_each(|_| {
        let ref mut rng = rand::rng();
        let deal = Deck::new().deal_with(n, rng);
        let mut other = Permutation::random().relabel(&deal);
        for round in 0..indexer.rounds() {
            let start = indexer.schedule().start(round);
            let end = start + indexer.schedule().cards(round);
            other[start..end].shuffle(rng);
        }
        let index = indexer.index_last(&deal)?;
        anyhow::ensure!(index < size, "{} indexed out of range: {}", show(&deal), index);
        let twin = indexer.index_last(&other)?;
        anyhow::ensure!(index == twin, "{} and {} index apart", show(&deal), show(&other));
        let canonical = indexer.unindex(last, index)?;
        anyhow::ensure!(
            indexer.index_last(canonical.cards())? == index,
            "{} does not round-trip",
            canonical
        );
        Ok(())
    })?;
    println!("random check passed: {} deals", samples);
    Ok(())
}

/// the `p`th ordered deal of `n` cards, mixed radix over the shrinking deck
fn nth_deal(p: u64, n: usize) -> Vec<Card> {
    let mut p = p;
    let mut used = Hand::empty();
    (0..n)
        .map(|j| {
            let left = 52 - j as u64;
            let card = used
                .complement()
                .nth((p % left) as usize)
                .expect("deck lookup");
            p /= left;
            used = Hand::add(used, Hand::from(card));
            card
        })
        .collect()
}

fn show(cards: &[Card]) -> String {
    cards.iter().map(|c| c.to_string()).collect()
}
