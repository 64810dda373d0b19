/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 时间序列预测模型：基础 trait `TimeSeriesModel` 与 DCRNN
 */

pub mod dcrnn;
mod error;
mod model;

pub use error::ModelError;
pub use model::{OptimizerSetup, TimeSeriesModel, TrainingStepOutput};
