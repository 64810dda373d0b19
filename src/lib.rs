//! # torchts
//!
//! `torchts`用纯rust实现基于图结构的时间序列预测模型：在轻量的动态计算图（自动微分）之上，
//! 提供扩散卷积循环神经网络（[DCRNN](https://arxiv.org/abs/1707.01926)）的编码器-解码器、
//! 课程学习（scheduled sampling）以及配套的训练步骤、优化器与学习率调度。
//!

pub mod data;
pub mod errors;
pub mod models;
pub mod nn;
pub mod tensor;
