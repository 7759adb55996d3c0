mod common;

use common::ScriptedEnv;
use episode::{
    run_all, run_episode, Action, EnvironmentGuard, Environment, EpisodeDescriptor, EpisodeError,
    EpisodeOutcome, EpisodeRunner, Metrics, Observation, SparseSuccessReward, StepObserver,
    StepRecord, TrainingSummary, UniformRandom,
};

/// Records the order in which the runner reports resets, steps and
/// finished episodes.
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl StepObserver for EventLog {
    fn on_reset(&mut self, episode: &EpisodeDescriptor, observation: &Observation) {
        assert!(observation.get("objectgoal").is_some());
        self.events.push(format!("reset {}", episode.episode_id));
    }

    fn on_step(&mut self, record: &StepRecord<'_>) {
        self.events.push(format!("step {}", record.step));
    }

    fn on_episode_end(&mut self, outcome: &EpisodeOutcome) {
        self.events.push(format!("end {} after {}", outcome.episode_id, outcome.steps));
    }
}

fn first_episode(env: &ScriptedEnv) -> episode::EpisodeDescriptor {
    env.episodes()[0].clone()
}

#[test]
fn never_finishing_episode_stops_at_the_cap() {
    for cap in [0usize, 1, 7, 100] {
        let mut env = ScriptedEnv::new(None);
        let ep = first_episode(&env);
        let outcome = run_episode(&mut env, &ep, cap).unwrap();
        assert_eq!(env.total_step_calls, cap);
        assert_eq!(outcome.steps, cap);
    }
}

#[test]
fn zero_cap_still_resets() {
    let mut env = ScriptedEnv::new(None);
    let ep = first_episode(&env);
    let outcome = run_episode(&mut env, &ep, 0).unwrap();
    assert_eq!(env.resets, 1);
    assert_eq!(outcome.total_reward, 0.0);
}

#[test]
fn early_completion_wins_over_the_cap() {
    for (k, cap) in [(1usize, 100usize), (3, 3), (5, 50)] {
        let mut env = ScriptedEnv::new(Some(k));
        let ep = first_episode(&env);
        let outcome = run_episode(&mut env, &ep, cap).unwrap();
        assert_eq!(env.total_step_calls, k);
        assert_eq!(outcome.steps, k);
    }
}

#[test]
fn default_policy_sends_constant_velocity() {
    let mut env = ScriptedEnv::new(Some(2));
    let ep = first_episode(&env);
    run_episode(&mut env, &ep, 10).unwrap();
    for action in &env.actions {
        assert_eq!(action, &Action::velocity_control(0.5, 0.5));
    }
}

#[test]
fn reward_uses_post_action_completion() {
    // Finishes on the third step without success: two step penalties and one
    // failure penalty.
    let mut env = ScriptedEnv::new(Some(3));
    let ep = first_episode(&env);
    let outcome = run_episode(&mut env, &ep, 10).unwrap();
    let expected = 2.0 * SparseSuccessReward::STEP_PENALTY + SparseSuccessReward::FAILURE_PENALTY;
    assert!((outcome.total_reward - expected).abs() < 1e-12);
}

#[test]
fn successful_episode_collects_the_bonus() {
    let mut env = ScriptedEnv::new(Some(1));
    env.succeed = true;
    let ep = first_episode(&env);
    let outcome = run_episode(&mut env, &ep, 10).unwrap();
    assert_eq!(outcome.total_reward, SparseSuccessReward::SUCCESS_BONUS);
    assert!(outcome.metrics.success());
}

#[test]
fn replay_with_same_seed_is_deterministic() {
    let run = || {
        let mut env = ScriptedEnv::new(Some(40));
        env.succeed = true;
        let ep = first_episode(&env);
        let mut runner = EpisodeRunner::new(30).with_action_policy(UniformRandom::navigation(11));
        let outcome = runner.run(&mut env, &ep).unwrap();
        (outcome.total_reward, env.actions)
    };
    let (reward_a, actions_a) = run();
    let (reward_b, actions_b) = run();
    assert_eq!(reward_a, reward_b);
    assert_eq!(actions_a, actions_b);
}

#[test]
fn custom_policies_are_injected() {
    let mut env = ScriptedEnv::new(Some(4));
    let ep = first_episode(&env);
    let mut runner = EpisodeRunner::new(10)
        .with_action_policy(|_: &Observation| Action::discrete("turn_left"))
        .with_reward_policy(|_: &Metrics, done: bool, _: &Observation| if done { 100.0 } else { 1.0 });
    let outcome = runner.run(&mut env, &ep).unwrap();
    assert_eq!(outcome.total_reward, 103.0);
    assert!(env.actions.iter().all(|a| a.name() == "turn_left"));
}

#[test]
fn observer_sees_every_step_in_order() {
    let mut env = ScriptedEnv::new(Some(3));
    let ep = first_episode(&env);
    let mut seen = Vec::new();
    let mut observer = |record: &StepRecord<'_>| seen.push((record.step, record.done));
    EpisodeRunner::new(10).run_observed(&mut env, &ep, &mut observer).unwrap();
    assert_eq!(seen, vec![(0, false), (1, false), (2, true)]);
}

#[test]
fn step_errors_propagate() {
    let mut env = ScriptedEnv::new(None);
    env.fail_on_step = Some(2);
    let ep = first_episode(&env);
    let err = run_episode(&mut env, &ep, 10).unwrap_err();
    assert!(matches!(err, EpisodeError::Environment(_)));
    assert_eq!(env.total_step_calls, 2);
}

#[test]
fn run_all_visits_every_episode_and_closes() {
    let mut env = ScriptedEnv::new(Some(2)).with_episodes(3);
    let mut runner = EpisodeRunner::new(10);
    let outcomes = run_all(&mut env, &mut runner, &mut |_: &StepRecord<'_>| {}).unwrap();
    let ids: Vec<&str> = outcomes.iter().map(|o| o.episode_id.as_str()).collect();
    assert_eq!(ids, ["ep-0", "ep-1", "ep-2"]);
    assert_eq!(env.resets, 3);
    assert_eq!(env.closes, 1);
}

#[test]
fn run_all_reports_resets_before_steps() {
    let mut env = ScriptedEnv::new(Some(2)).with_episodes(2);
    let mut runner = EpisodeRunner::new(10);
    let mut log = EventLog::default();
    run_all(&mut env, &mut runner, &mut log).unwrap();
    assert_eq!(
        log.events,
        [
            "reset ep-0",
            "step 0",
            "step 1",
            "end ep-0 after 2",
            "reset ep-1",
            "step 0",
            "step 1",
            "end ep-1 after 2",
        ]
    );
}

#[test]
fn run_all_closes_on_failure() {
    let mut env = ScriptedEnv::new(Some(2)).with_episodes(3);
    env.fail_on_step = Some(3);
    let mut runner = EpisodeRunner::new(10);
    let result = run_all(&mut env, &mut runner, &mut |_: &StepRecord<'_>| {});
    assert!(result.is_err());
    assert_eq!(env.closes, 1);
}

#[test]
fn guard_closes_exactly_once() {
    let mut env = ScriptedEnv::new(None);
    {
        let guard = EnvironmentGuard::new(&mut env);
        guard.close();
    }
    assert_eq!(env.closes, 1);
    {
        let mut guard = EnvironmentGuard::new(&mut env);
        guard.reset().unwrap();
    }
    assert_eq!(env.closes, 2);
}

#[test]
fn summary_aggregates_outcomes() {
    let mut env = ScriptedEnv::new(Some(1)).with_episodes(2);
    env.succeed = true;
    let mut runner = EpisodeRunner::new(5);
    let outcomes = run_all(&mut env, &mut runner, &mut |_: &StepRecord<'_>| {}).unwrap();
    let summary = TrainingSummary::from_outcomes(&outcomes);
    assert_eq!(summary.episodes, 2);
    assert_eq!(summary.successes, 2);
    assert_eq!(summary.mean_reward, 10.0);
    assert_eq!(summary.success_rate(), 1.0);
    assert_eq!(TrainingSummary::from_outcomes(&[]).episodes, 0);
}
