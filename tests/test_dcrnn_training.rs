/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : DCRNN 端到端训练测试：在环形图上的合成正弦序列上，
 *                 模拟外部训练器（按批调用 training_step、按 epoch 推进学习率调度）
 */

use torchts::data::{Scaler, StandardScaler};
use torchts::models::dcrnn::{Dcrnn, DcrnnConfig};
use torchts::models::{ModelError, TimeSeriesModel};
use torchts::nn::{FilterType, LrScheduler, Optimizer};
use torchts::tensor::Tensor;
use tracing_subscriber::EnvFilter;

const NUM_NODES: usize = 4;
const SEQ_LEN: usize = 3;
const HORIZON: usize = 2;
const BATCH_SIZE: usize = 8;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 环形图 0 -> 1 -> 2 -> 3 -> 0
fn ring_adjacency() -> Tensor {
    let mut data = vec![0.0; NUM_NODES * NUM_NODES];
    for i in 0..NUM_NODES {
        data[i * NUM_NODES + (i + 1) % NUM_NODES] = 1.0;
    }
    Tensor::new(&data, &[NUM_NODES, NUM_NODES])
}

fn series(node: usize, t: usize) -> f32 {
    (0.3 * t as f32 + node as f32).sin() + 2.0
}

/// 以`starts`中的每个时刻为起点切出一个样本：
/// x 为 [batch, SEQ_LEN, NUM_NODES, 1]，y 为 [batch, HORIZON, NUM_NODES, 1]
fn make_batch(starts: &[usize]) -> (Tensor, Tensor) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for &t0 in starts {
        for i in 0..SEQ_LEN {
            x.extend((0..NUM_NODES).map(|n| series(n, t0 + i)));
        }
        for j in 0..HORIZON {
            y.extend((0..NUM_NODES).map(|n| series(n, t0 + SEQ_LEN + j)));
        }
    }
    let b = starts.len();
    (
        Tensor::new(&x, &[b, SEQ_LEN, NUM_NODES, 1]),
        Tensor::new(&y, &[b, HORIZON, NUM_NODES, 1]),
    )
}

fn config() -> DcrnnConfig {
    DcrnnConfig {
        num_nodes: NUM_NODES,
        horizon: HORIZON,
        filter_type: FilterType::DualRandomWalk,
        cl_decay_steps: 20,
        use_curriculum_learning: true,
        ..DcrnnConfig::new(8, SEQ_LEN)
    }
}

#[test]
fn test_dcrnn_learns_synthetic_series() -> Result<(), ModelError> {
    init_logging();

    let raw = Tensor::new(
        &(0..40)
            .flat_map(|t| (0..NUM_NODES).map(move |n| series(n, t)))
            .collect::<Vec<_>>(),
        &[40, NUM_NODES],
    );
    let scaler = StandardScaler::fit(&raw);
    let batches = [0usize, 8]
        .iter()
        .map(|&offset| {
            let starts = (offset..offset + BATCH_SIZE).collect::<Vec<_>>();
            let (x, y) = make_batch(&starts);
            (scaler.transform(&x), scaler.transform(&y))
        })
        .collect::<Vec<_>>();

    let model = Dcrnn::with_seed(&ring_adjacency(), Box::new(scaler), config(), 2026)?;
    let mut setup = model.configure_optimizers();
    let mut scheduler = setup.scheduler.take().expect("DCRNN 应配置学习率调度器");

    let mut batches_seen = 0u64;
    let mut epoch_losses = Vec::new();
    for _epoch in 0..15 {
        let mut total = 0.0;
        for (x, y) in &batches {
            let out = model.training_step((x, y), batches_seen)?;
            assert!(out.loss.is_finite());
            setup.optimizer.step()?;
            batches_seen += 1;
            total += out.loss;
        }
        epoch_losses.push(total / batches.len() as f32);
        scheduler.step();
        scheduler.apply(&mut *setup.optimizer);
    }
    let (first, last) = (epoch_losses[0], epoch_losses[epoch_losses.len() - 1]);
    assert!(last < first, "epoch losses: {epoch_losses:?}");

    // 预测：输入为 [seq_len, batch, num_nodes * input_dim]
    let (x, _) = &batches[0];
    let inputs = x.permute(&[1, 0, 2, 3]).reshape(&[SEQ_LEN, BATCH_SIZE, NUM_NODES]);
    let pred = model.predict(&inputs)?;
    assert_eq!(pred.shape(), &[HORIZON, BATCH_SIZE, NUM_NODES]);
    assert!(pred.is_finite());
    Ok(())
}

#[test]
fn test_checkpoint_restores_predictions() -> Result<(), ModelError> {
    init_logging();
    let path = std::env::temp_dir().join(format!("torchts_it_{}.bin", std::process::id()));
    let (x, y) = make_batch(&[0, 1, 2, 3]);
    let inputs = x.permute(&[1, 0, 2, 3]).reshape(&[SEQ_LEN, 4, NUM_NODES]);

    let trained = Dcrnn::with_seed(&ring_adjacency(), Box::new(StandardScaler::new(2.0, 1.0)), config(), 1)?;
    let mut setup = trained.configure_optimizers();
    for step in 0..3 {
        trained.training_step((&x, &y), step)?;
        setup.optimizer.step()?;
    }
    trained.save_params(&path)?;

    let restored = Dcrnn::with_seed(&ring_adjacency(), Box::new(StandardScaler::new(2.0, 1.0)), config(), 99)?;
    restored.load_params(&path)?;
    assert_eq!(trained.predict(&inputs)?, restored.predict(&inputs)?);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
