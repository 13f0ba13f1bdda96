use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::constants::AUTO_SOLVE_STEP_MS;
use crate::session::{AutoSolveStep, GameSession};

pub type SharedSession = Arc<Mutex<GameSession>>;

// Drains the remaining solution path, one move per step interval. The lock
// is released between steps so the session stays observable while solving.
// Returns true when the drain ran to completion, false when it could not
// start or was invalidated by a reset.
pub async fn drive_auto_solve(session: SharedSession) -> bool {
    drive_auto_solve_with_interval(session, AUTO_SOLVE_STEP_MS).await
}

pub async fn drive_auto_solve_with_interval(session: SharedSession, step_ms: u64) -> bool {
    let ticket = {
        let mut session = session.lock().await;
        match session.start_auto_solve() {
            Some(ticket) => ticket,
            None => return false,
        }
    };

    loop {
        sleep(Duration::from_millis(step_ms)).await;
        let step = {
            let mut session = session.lock().await;
            session.auto_solve_step(ticket)
        };
        match step {
            AutoSolveStep::Applied { .. } => {}
            AutoSolveStep::Finished => return true,
            AutoSolveStep::Stale => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Mutex;

    use super::{drive_auto_solve_with_interval, SharedSession};
    use crate::rng::PickSource;
    use crate::session::{GameSession, SessionOptions};
    use crate::types::SessionPhase;

    struct ScriptedPicks {
        picks: Vec<usize>,
        at: usize,
    }

    impl PickSource for ScriptedPicks {
        fn pick_cell(&mut self, _cell_count: usize) -> usize {
            let pick = self.picks[self.at];
            self.at += 1;
            pick
        }
    }

    // Shuffle picks [3,7,3,12,20,1,9] leave a five-move solution path.
    fn shared_session() -> SharedSession {
        let mut source = ScriptedPicks {
            picks: vec![3, 7, 3, 12, 20, 1, 9],
            at: 0,
        };
        Arc::new(Mutex::new(GameSession::from_source(
            SessionOptions::default(),
            &mut source,
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn drain_runs_to_completion() {
        let session = shared_session();
        assert_eq!(session.lock().await.solution().len(), 5);

        let finished = drive_auto_solve_with_interval(Arc::clone(&session), 300).await;
        assert!(finished);

        let session = session.lock().await;
        assert!(session.won());
        assert!(!session.is_auto_solving());
        assert!(session.solution().is_empty());
        assert!(session.board().is_solved());
        assert_eq!(session.moves(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn second_drain_is_rejected_while_running() {
        let session = shared_session();
        let first = tokio::spawn(drive_auto_solve_with_interval(Arc::clone(&session), 300));
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = drive_auto_solve_with_interval(Arc::clone(&session), 300).await;
        assert!(!second);
        assert!(first.await.expect("driver should not panic"));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_drain_leaves_new_session_untouched() {
        let session = shared_session();
        let driver = tokio::spawn(drive_auto_solve_with_interval(Arc::clone(&session), 300));

        // Let one step land, then reset while the next one is scheduled.
        tokio::time::sleep(Duration::from_millis(450)).await;
        let (board, solution) = {
            let mut session = session.lock().await;
            session.reset(777);
            (session.board().clone(), session.solution().to_vec())
        };

        assert!(!driver.await.expect("driver should not panic"));

        let session = session.lock().await;
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.board(), &board);
        assert_eq!(session.solution(), solution.as_slice());
    }
}
