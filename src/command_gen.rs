//! Synthetic command stream: deterministic seeded New/Cancel mix.
//!
//! Drives benches, property tests, and load demos. Same config + seed
//! produces the same sequence of commands.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Command, OrderId, Side};

/// Configuration for the synthetic command generator. Ranges are inclusive.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same command stream.
    pub seed: u64,
    /// Number of commands to generate when collecting.
    pub num_commands: usize,
    /// Instruments to spread orders across.
    pub instruments: Vec<String>,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability that a command cancels a previously issued id.
    pub cancel_ratio: f64,
    pub price_min: i64,
    pub price_max: i64,
    pub quantity_min: u64,
    pub quantity_max: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_commands: 1000,
            instruments: vec!["ABC".into(), "XYZ".into()],
            buy_ratio: 0.5,
            cancel_ratio: 0.1,
            price_min: 95,
            price_max: 105,
            quantity_min: 1,
            quantity_max: 100,
        }
    }
}

/// Deterministic command stream. Create with [`Generator::new`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_order_id: u64,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_order_id: 1,
        }
    }

    /// Generates the next command. Advances internal state (order id, RNG).
    pub fn next_command(&mut self) -> Command {
        let cancel = self.next_order_id > 1 && self.rng.gen::<f64>() < self.config.cancel_ratio;
        if cancel {
            let target = self.rng.gen_range(1..self.next_order_id);
            return Command::Cancel {
                order_id: OrderId(target),
            };
        }
        let order_id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
            Side::Buy
        } else {
            Side::Sell
        };
        let instrument =
            self.config.instruments[self.rng.gen_range(0..self.config.instruments.len())].clone();
        let price = self.rng.gen_range(self.config.price_min..=self.config.price_max);
        let quantity = self
            .rng
            .gen_range(self.config.quantity_min..=self.config.quantity_max);
        Command::New {
            order_id,
            instrument,
            price,
            quantity,
            side,
        }
    }

    /// Collects `num_commands` commands, consuming the generator.
    pub fn all_commands(mut self) -> Vec<Command> {
        (0..self.config.num_commands)
            .map(|_| self.next_command())
            .collect()
    }
}
