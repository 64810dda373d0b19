use super::Optimizer;
use tracing::debug;

/// 学习率调度器
///
/// 每个 epoch 结束调用一次`step`，再通过`apply`把新学习率写入优化器。
pub trait LrScheduler {
    /// 推进一个 epoch，返回新的学习率
    fn step(&mut self) -> f32;

    /// 当前学习率
    fn get_lr(&self) -> f32;

    /// 回到第 0 个 epoch
    fn reset(&mut self);

    /// 把当前学习率写入优化器
    fn apply(&self, optimizer: &mut dyn Optimizer) {
        optimizer.set_learning_rate(self.get_lr());
    }
}

/// 多阶段衰减：每到达一个里程碑 epoch，学习率乘以`gamma`
///
/// `lr(epoch) = base_lr * gamma^(里程碑中 <= epoch 的个数)`
#[derive(Debug, Clone)]
pub struct MultiStepLr {
    base_lr: f32,
    /// 升序、去重后的里程碑
    milestones: Vec<usize>,
    gamma: f32,
    epoch: usize,
}

impl MultiStepLr {
    pub fn new(base_lr: f32, milestones: &[usize], gamma: f32) -> Self {
        let mut milestones = milestones.to_vec();
        milestones.sort_unstable();
        milestones.dedup();
        Self {
            base_lr,
            milestones,
            gamma,
            epoch: 0,
        }
    }

    /// 指定 epoch 对应的学习率
    pub fn lr_at(&self, epoch: usize) -> f32 {
        let passed = self.milestones.iter().filter(|&&m| m <= epoch).count();
        self.base_lr * self.gamma.powi(passed as i32)
    }

    pub const fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn milestones(&self) -> &[usize] {
        &self.milestones
    }

    pub const fn gamma(&self) -> f32 {
        self.gamma
    }
}

impl LrScheduler for MultiStepLr {
    fn step(&mut self) -> f32 {
        self.epoch += 1;
        let lr = self.get_lr();
        if self.milestones.binary_search(&self.epoch).is_ok() {
            debug!(epoch = self.epoch, lr, "学习率到达里程碑，已衰减");
        }
        lr
    }

    fn get_lr(&self) -> f32 {
        self.lr_at(self.epoch)
    }

    fn reset(&mut self) {
        self.epoch = 0;
    }
}
