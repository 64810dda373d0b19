/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : 神经网络层
 */

mod dcgru;
mod diffusion;
mod linear;

pub use dcgru::{Dcgru, DcgruOptions};
pub use diffusion::{FilterType, build_supports};
pub use linear::Linear;

use crate::nn::{GraphError, Var, VarMatrixOps};

/// 行广播加偏置：`x [rows, out] + ones [rows, 1] @ b [1, out]`
pub(crate) fn add_row_bias(x: &Var, bias: &Var) -> Result<Var, GraphError> {
    let rows = x.value_expected_shape()?[0];
    let ones = x.get_graph().ones(&[rows, 1])?;
    let bias_broadcast = ones.matmul(bias)?;
    x.try_add(&bias_broadcast)
}
