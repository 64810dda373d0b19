/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : DCRNN：扩散卷积循环神经网络（编码器-解码器 + 课程学习）
 */

mod config;
mod decoder;
mod encoder;
mod model;

pub use config::{ConfigError, DcrnnConfig};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use model::Dcrnn;

#[cfg(test)]
mod tests;
