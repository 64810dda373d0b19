/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的乘法，实现了两个同形张量“逐元素”（或张量与纯数）相乘的运算，并返回一个新的张量。
 *                 注意：这里的乘法不是矩阵乘法，矩阵乘法请使用`mat_mul`
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::MulAssign;

impl_tensor_binary_op!(Mul, mul, *, Operator::Mul);

impl MulAssign<&Tensor> for Tensor {
    fn mul_assign(&mut self, rhs: &Tensor) {
        assert!(
            self.is_same_shape(rhs),
            "{}",
            TensorError::OperatorError {
                operator: Operator::MulAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: rhs.shape().to_vec(),
            }
        );
        self.data *= &rhs.data;
    }
}

impl MulAssign<f32> for Tensor {
    fn mul_assign(&mut self, rhs: f32) {
        self.data *= rhs;
    }
}
