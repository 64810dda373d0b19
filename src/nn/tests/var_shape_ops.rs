use crate::nn::{Graph, GraphError, Var, VarShapeOps};
use crate::tensor::Tensor;

#[test]
fn test_select_and_stack_values() -> Result<(), GraphError> {
    let graph = Graph::new();
    // [seq=2, batch=1, width=3]
    let seq = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 1, 3]))?;
    let step1 = seq.select(0, 1)?;
    assert_eq!(step1.compute()?, Tensor::new(&[4.0, 5.0, 6.0], &[1, 3]));

    let stacked = Var::stack(&[&step1, &seq.select(0, 0)?])?;
    assert_eq!(
        stacked.compute()?,
        Tensor::new(&[4.0, 5.0, 6.0, 1.0, 2.0, 3.0], &[2, 1, 3])
    );
    Ok(())
}

#[test]
fn test_concat_narrow_permute_values() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.input(&Tensor::new(&[1.0, 2.0], &[2, 1]))?;
    let b = graph.input(&Tensor::new(&[3.0, 4.0, 5.0, 6.0], &[2, 2]))?;
    let c = Var::concat(&[&a, &b], 1)?;
    assert_eq!(
        c.compute()?,
        Tensor::new(&[1.0, 3.0, 4.0, 2.0, 5.0, 6.0], &[2, 3])
    );
    assert_eq!(
        c.narrow(1, 1, 2)?.compute()?,
        Tensor::new(&[3.0, 4.0, 5.0, 6.0], &[2, 2])
    );
    assert_eq!(
        c.permute(&[1, 0])?.compute()?,
        Tensor::new(&[1.0, 2.0, 3.0, 5.0, 4.0, 6.0], &[3, 2])
    );
    Ok(())
}

#[test]
fn test_shape_op_errors() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[2, 3]))?;
    assert!(x.reshape(&[4, 2]).is_err());
    assert!(x.permute(&[0, 0]).is_err());
    assert!(x.narrow(1, 2, 2).is_err());
    assert!(x.select(2, 0).is_err());
    assert!(Var::concat(&[], 0).is_err());

    let other = Graph::new().input(&Tensor::ones(&[2, 3]))?;
    assert!(Var::concat(&[&x, &other], 0).is_err());
    Ok(())
}
