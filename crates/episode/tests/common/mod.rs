use episode::{
    Action, Environment, EpisodeDescriptor, EpisodeError, Metrics, Observation, SensorValue,
};

/// Scripted environment: finishes after `done_after` steps (if set), reports
/// success when `succeed` is set and can be told to fail on a given step.
pub struct ScriptedEnv {
    pub episodes: Vec<EpisodeDescriptor>,
    pub done_after: Option<usize>,
    pub succeed: bool,
    pub fail_on_step: Option<usize>,
    pub steps_taken: usize,
    pub total_step_calls: usize,
    pub resets: usize,
    pub closes: usize,
    pub actions: Vec<Action>,
    current: Option<usize>,
    over: bool,
}

impl ScriptedEnv {
    pub fn new(done_after: Option<usize>) -> Self {
        Self {
            episodes: vec![EpisodeDescriptor::new("ep-0", "scenes/00001-abc/abc.basis.glb")],
            done_after,
            succeed: false,
            fail_on_step: None,
            steps_taken: 0,
            total_step_calls: 0,
            resets: 0,
            closes: 0,
            actions: Vec::new(),
            current: None,
            over: false,
        }
    }

    pub fn with_episodes(mut self, count: usize) -> Self {
        self.episodes = (0..count)
            .map(|i| EpisodeDescriptor::new(format!("ep-{i}"), format!("scenes/0000{i}-s{i}/s{i}.glb")))
            .collect();
        self
    }

    fn observation(&self) -> Observation {
        Observation::new().with("objectgoal", SensorValue::Indices(vec![self.steps_taken as i64]))
    }
}

impl Environment for ScriptedEnv {
    fn reset(&mut self) -> Result<Observation, EpisodeError> {
        if self.episodes.is_empty() {
            return Err(EpisodeError::NoEpisodes);
        }
        let next = self.current.map_or(0, |c| (c + 1) % self.episodes.len());
        self.current = Some(next);
        self.resets += 1;
        self.steps_taken = 0;
        self.over = false;
        Ok(self.observation())
    }

    fn step(&mut self, action: &Action) -> Result<Observation, EpisodeError> {
        self.total_step_calls += 1;
        if self.fail_on_step == Some(self.total_step_calls) {
            return Err(EpisodeError::Environment("simulator crashed".into()));
        }
        self.actions.push(action.clone());
        self.steps_taken += 1;
        if let Some(limit) = self.done_after {
            self.over = self.steps_taken >= limit;
        }
        Ok(self.observation())
    }

    fn episode_over(&self) -> bool {
        self.over
    }

    fn metrics(&self) -> Metrics {
        let mut metrics = Metrics::new().with("distance_to_goal", 1.0);
        metrics.set_flag(Metrics::SUCCESS, self.over && self.succeed);
        metrics
    }

    fn episodes(&self) -> &[EpisodeDescriptor] {
        &self.episodes
    }

    fn current_episode(&self) -> Option<&EpisodeDescriptor> {
        self.current.and_then(|c| self.episodes.get(c))
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}
