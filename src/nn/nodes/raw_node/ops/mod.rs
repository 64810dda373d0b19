mod add;
mod concat;
mod mat_mul;
mod multiply;
mod narrow;
mod permute;
mod reshape;
mod scalar;
mod select;
mod sigmoid;
mod subtract;
mod tanh;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use concat::Concat;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use multiply::Multiply;
pub(in crate::nn) use narrow::Narrow;
pub(in crate::nn) use permute::Permute;
pub(in crate::nn) use reshape::Reshape;
pub(in crate::nn) use scalar::{ScalarAdd, ScalarMultiply};
pub(in crate::nn) use select::Select;
pub(in crate::nn) use sigmoid::Sigmoid;
pub(in crate::nn) use subtract::Subtract;
pub(in crate::nn) use tanh::Tanh;
