//! Bonus buy: pay a fixed bet multiple to enter free spins directly

use rand::Rng;

use crate::free_spins::FreeSpinsSession;
use crate::grid::Grid;
use crate::model::GameModel;

/// A purchased bonus round, ready to be played
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOutcome {
    /// Price paid: buy multiplier × bet
    pub cost: f64,
    /// Trigger grid with exactly the trigger count of scatters; pays nothing
    pub trigger_grid: Grid,
    /// Session already `Running` with the starting spin count
    pub session: FreeSpinsSession,
}

impl BuyOutcome {
    /// Net result once the session has been played out
    pub fn net(&self) -> f64 {
        self.session.total_win() - self.cost
    }
}

/// Buy a free-spins round at `bet`
pub fn buy_free_spins<R: Rng + ?Sized>(rng: &mut R, model: &GameModel, bet: f64) -> BuyOutcome {
    let rules = model.free_spins();
    let trigger_grid = model
        .generator()
        .generate_with_scatters(rng, rules.trigger_scatters());

    log::debug!("bonus bought at bet {bet} for {}", model.buy_cost_multiplier() * bet);

    BuyOutcome {
        cost: model.buy_cost_multiplier() * bet,
        trigger_grid,
        session: FreeSpinsSession::running(rules, bet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::free_spins::SessionState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_buy_starts_running_session() {
        let model = GameConfig::default().validate().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(130);

        let mut bought = buy_free_spins(&mut rng, &model, 2.0);
        assert_eq!(bought.cost, 260.0);
        assert_eq!(bought.trigger_grid.scatter_count(), 3);
        assert_eq!(bought.session.state(), SessionState::Running);
        assert_eq!(bought.session.spins_remaining(), 10);

        let win = bought.session.run_to_completion(&mut rng, &model);
        assert_eq!(bought.net(), win - 260.0);
    }
}
