use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use common::quick_param;
use ql_experiment::error::ExperimentError;
use ql_experiment::experiment::parameter::Parameter;
use ql_experiment::experiment::runner::{Experiment, Phase};
use ql_experiment::test::recording_agent::{AgentEvent, RecordingAgent};
use ql_experiment::test::scripted_environment::{ScriptedEnvironment, ScriptedFailure};

mod common;

#[rstest]
#[case(100, 30, 4)]
#[case(90, 30, 3)]
#[case(91, 30, 4)]
#[case(1, 30, 1)]
#[case(100, 1, 100)]
fn test_block_episode_count(
    #[case] epoch_length: usize,
    #[case] episode_steps: usize,
    #[case] expected_episodes: usize,
) -> Result<()> {
    let env = ScriptedEnvironment::builder().frames_per_game(2 + episode_steps).build();
    let mut experiment = Experiment::new(env, RecordingAgent::default(), quick_param(), StdRng::seed_from_u64(5))?;

    let summary = experiment.run_epoch(1, epoch_length, Phase::Training)?;

    assert_eq!(summary.episodes, expected_episodes);
    assert_eq!(summary.steps, expected_episodes * episode_steps);
    let ends = experiment.agent().episode_ends();
    assert_eq!(ends.len(), expected_episodes);
    assert!(ends.iter().all(|&(_, terminal)| terminal));
    Ok(())
}

#[test]
fn test_every_episode_is_started_and_ended_once() -> Result<()> {
    let env = ScriptedEnvironment::builder().lives(3).frames_per_life(25).build();
    let param = Parameter {
        num_epochs: 3,
        epoch_length: 200,
        test_length: 50,
        frame_skip: 4,
        max_start_nullops: 10,
        max_steps_per_episode: 15,
        ..quick_param()
    };
    let mut experiment = Experiment::new(env, RecordingAgent::new(vec![0, 1, 2, 3]), param, StdRng::seed_from_u64(9))?;

    let summaries = experiment.run()?;

    let agent = experiment.agent();
    let episodes: usize = summaries
        .iter()
        .map(|s| s.training.episodes + s.testing.as_ref().map_or(0, |t| t.episodes))
        .sum();
    assert_eq!(agent.episode_starts(), episodes);
    assert_eq!(agent.episode_ends().len(), episodes);

    // start and end alternate strictly
    let mut open = false;
    for event in agent.events() {
        match event {
            AgentEvent::StartEpisode { .. } => {
                assert!(!open);
                open = true;
            }
            AgentEvent::EndEpisode { .. } => {
                assert!(open);
                open = false;
            }
            AgentEvent::Step { .. } => assert!(open),
            _ => assert!(!open),
        }
    }

    // no episode exceeds the step limit
    let mut steps = 0;
    for event in agent.events() {
        match event {
            AgentEvent::StartEpisode { .. } => steps = 1,
            AgentEvent::Step { .. } => steps += 1,
            AgentEvent::EndEpisode { .. } => assert!(steps <= 15),
            _ => {}
        }
    }
    Ok(())
}

#[test]
fn test_same_seed_same_run() -> Result<()> {
    let run = || -> Result<Vec<AgentEvent>> {
        let env = ScriptedEnvironment::builder().lives(2).frames_per_life(40).reward_per_frame(0.5).build();
        let param = Parameter {
            num_epochs: 2,
            epoch_length: 60,
            test_length: 20,
            frame_skip: 3,
            max_start_nullops: 30,
            ..quick_param()
        };
        let mut experiment = Experiment::new(env, RecordingAgent::new(vec![1, 3]), param, StdRng::seed_from_u64(1234))?;
        experiment.run()?;
        Ok(experiment.agent().events().to_vec())
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn test_environment_failure_aborts_the_run() -> Result<()> {
    let env = ScriptedEnvironment::builder().frames_per_game(20).fail_at_frame(50).build();
    let mut experiment = Experiment::new(env, RecordingAgent::default(), quick_param(), StdRng::seed_from_u64(5))?;

    let err = experiment.run().unwrap_err();

    assert_eq!(err.downcast_ref::<ScriptedFailure>(), Some(&ScriptedFailure(50)));
    assert_eq!(experiment.environment().frame_count(), 49);
    Ok(())
}

#[test]
fn test_unknown_resize_method_is_rejected() {
    let result = "bilinear".parse::<ql_experiment::frame::resize::ResizeMethod>();
    assert!(matches!(result, Err(ExperimentError::Configuration(_))));
}

#[test]
fn test_invalid_parameter_is_rejected_at_construction() {
    let param = Parameter {
        frame_skip: 0,
        ..quick_param()
    };
    let result = Experiment::new(ScriptedEnvironment::default(), RecordingAgent::default(), param, StdRng::seed_from_u64(5));
    let err = result.err().expect("construction must fail");
    assert!(matches!(err.downcast_ref::<ExperimentError>(), Some(ExperimentError::Configuration(_))));
}
