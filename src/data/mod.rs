//! 数据预处理模块
//!
//! # 主要组件
//!
//! - [`Scaler`]: 数据缩放器接口（模型在计算损失前用它把数据还原到原始量纲）
//! - [`StandardScaler`]: 标准化（`(x - mean) / std`）
//! - [`IdentityScaler`]: 不做任何变换
//!
//! # 使用示例
//!
//! ```ignore
//! use torchts::data::{Scaler, StandardScaler};
//!
//! let scaler = StandardScaler::fit(&train_x);
//! let x = scaler.transform(&train_x);
//! let restored = scaler.inverse_transform(&x);
//! ```

mod scaler;

pub use scaler::{IdentityScaler, Scaler, StandardScaler};

#[cfg(test)]
mod tests;
