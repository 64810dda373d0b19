/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 张量的其它运算：矩阵乘法、归约、逐元素函数等
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 矩阵乘法：`[m, n] @ [n, p] = [m, p]`，两者都必须是2阶张量
    pub fn mat_mul(&self, other: &Self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::MatMulNeed2Dims(self.dimension())
        );
        assert!(
            other.dimension() == 2,
            "{}",
            TensorError::MatMulNeed2Dims(other.dimension())
        );
        assert!(
            self.shape()[1] == other.shape()[0],
            "{}",
            TensorError::OperatorError {
                operator: Operator::MatMul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        match (
            self.data.view().into_dimensionality::<Ix2>(),
            other.data.view().into_dimensionality::<Ix2>(),
        ) {
            (Ok(a), Ok(b)) => Self::from_array(a.dot(&b).into_dyn()),
            _ => unreachable!("2阶张量必能转为Ix2视图"),
        }
    }

    /// 所有元素之和
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    /// 所有元素的均值（空张量返回0）
    pub fn mean(&self) -> f32 {
        if self.size() == 0 {
            return 0.0;
        }
        self.sum() / self.size() as f32
    }

    /// 所有元素平方和（即L2范数的平方）
    pub fn norm_squared(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// 逐元素应用函数`f`
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self::from_array(self.data.mapv(f))
    }

    pub fn abs(&self) -> Self {
        self.map(f32::abs)
    }

    /// 符号函数：正数为1，负数为-1，零为0（与`f32::signum`不同，后者对0返回1）
    pub fn sign(&self) -> Self {
        self.map(|x| {
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
    }

    pub fn sigmoid(&self) -> Self {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }

    pub fn sqrt(&self) -> Self {
        self.map(f32::sqrt)
    }

    pub fn powi(&self, n: i32) -> Self {
        self.map(|x| x.powi(n))
    }

    /// 生成掩码张量：元素不等于`value`处为1，否则为0
    pub fn not_equal_mask(&self, value: f32) -> Self {
        self.map(|x| if x == value { 0.0 } else { 1.0 })
    }

    /// 判断所有元素是否都是有限值（非NaN、非inf）
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}
