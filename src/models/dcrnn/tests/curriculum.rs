use super::{build_model, sample, small_config};
use crate::models::dcrnn::DcrnnConfig;
use crate::models::{ModelError, TimeSeriesModel};
use crate::nn::{Var, VarShapeOps};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn curriculum_config(cl_decay_steps: usize) -> DcrnnConfig {
    DcrnnConfig {
        use_curriculum_learning: true,
        cl_decay_steps,
        ..small_config()
    }
}

#[test]
fn test_sampling_threshold_decays() -> Result<(), ModelError> {
    let model = build_model(small_config(), 1)?;
    let thresholds = [0, 10, 100, 1_000, 5_000, 10_000]
        .iter()
        .map(|&b| model.compute_sampling_threshold(b))
        .collect::<Vec<_>>();
    assert!(thresholds.windows(2).all(|w| w[1] < w[0]));
    // batches_seen=0 时为 cl / (cl + 1)
    assert!((thresholds[0] - 1000.0 / 1001.0).abs() < 1e-12);
    assert!(model.compute_sampling_threshold(50_000) < 1e-10);
    Ok(())
}

#[test]
fn test_threshold_approaches_one_for_large_decay_steps() -> Result<(), ModelError> {
    let model = build_model(curriculum_config(1_000_000), 1)?;
    assert!(model.compute_sampling_threshold(0) > 0.999_998);
    assert!(model.compute_sampling_threshold(1_000) > 0.999_998);
    Ok(())
}

#[test]
fn test_labels_ignored_without_curriculum() -> Result<(), ModelError> {
    let model = build_model(small_config(), 2)?;
    let graph = model.graph();
    let inputs = graph.input(&sample(&[2, 1, 3], 0.0))?;
    let labels_a = graph.input(&sample(&[2, 1, 3], 1.0))?;
    let labels_b = graph.input(&sample(&[2, 1, 3], -5.0))?;

    let free = model.forward(&inputs, None, None)?.compute()?;
    let with_a = model.forward(&inputs, Some(&labels_a), Some(0))?.compute()?;
    let with_b = model.forward(&inputs, Some(&labels_b), Some(0))?.compute()?;
    assert_eq!(free, with_a);
    assert_eq!(free, with_b);
    Ok(())
}

#[test]
fn test_teacher_forcing_feeds_labels() -> Result<(), ModelError> {
    let model = build_model(curriculum_config(1_000_000), 3)?;
    let graph = model.graph();
    let inputs = graph.input(&sample(&[2, 1, 3], 0.0))?;
    let labels = graph.input(&sample(&[2, 1, 3], 2.0))?;
    let hidden = model.encoder(&inputs)?;

    let mut rng = StdRng::seed_from_u64(0);
    let outputs = model.decoder_with_rng(&hidden, Some(&labels), Some(0), &mut rng)?;

    // 阈值约为 1，第 1 步的输入应为 labels[0]
    let go = graph.zeros(&[1, 3])?;
    let (o0, h1) = model.decoder_model().forward(&go, &hidden)?;
    let (o1, _) = model
        .decoder_model()
        .forward(&labels.select(0, 0)?, &h1)?;
    let teacher_forced = Var::stack(&[&o0, &o1])?;
    assert_eq!(outputs.compute()?, teacher_forced.compute()?);

    // eval 模式下不做课程采样
    let free = graph.no_grad_scope(|_| model.forward(&inputs, Some(&labels), Some(0)))?;
    let (f1, _) = model.decoder_model().forward(&o0, &h1)?;
    let free_running = Var::stack(&[&o0, &f1])?;
    assert_eq!(free.compute()?, free_running.compute()?);
    assert_ne!(free.compute()?, outputs.compute()?);
    Ok(())
}

#[test]
fn test_curriculum_is_reproducible_with_seed() -> Result<(), ModelError> {
    // 阈值约 0.5：采样结果取决于随机数
    let model = build_model(curriculum_config(1), 4)?;
    let graph = model.graph();
    let inputs = graph.input(&sample(&[2, 1, 3], 0.0))?;
    let labels = graph.input(&sample(&[2, 1, 3], 3.0))?;
    let hidden = model.encoder(&inputs)?;

    let run = |seed: u64| -> Result<_, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(model
            .decoder_with_rng(&hidden, Some(&labels), Some(0), &mut rng)?
            .compute()?)
    };
    assert_eq!(run(42)?, run(42)?);
    Ok(())
}

#[test]
fn test_curriculum_requires_labels_and_batches_seen() -> Result<(), ModelError> {
    let model = build_model(curriculum_config(1000), 5)?;
    let graph = model.graph();
    let inputs = graph.input(&sample(&[2, 1, 3], 0.0))?;
    let labels = graph.input(&sample(&[2, 1, 3], 1.0))?;
    assert!(matches!(
        model.forward(&inputs, None, Some(0)),
        Err(ModelError::InvalidInput(_))
    ));
    assert!(matches!(
        model.forward(&inputs, Some(&labels), None),
        Err(ModelError::InvalidInput(_))
    ));
    let bad_labels = graph.input(&sample(&[3, 1, 3], 1.0))?;
    assert!(matches!(
        model.forward(&inputs, Some(&bad_labels), Some(0)),
        Err(ModelError::InvalidInput(_))
    ));
    // eval 模式下不需要标签
    assert!(graph.no_grad_scope(|_| model.forward(&inputs, None, None)).is_ok());
    Ok(())
}
