use tempfile::tempdir;

use twb_model::{parse_dimacs, read_dimacs, write_dimacs, Cnf, VariableMap};

fn sample_cnf() -> Cnf {
    let variables = VariableMap::new(vec![
        "featureA".into(),
        "featureB".into(),
        "featureC".into(),
    ])
    .unwrap();
    Cnf::new(variables, vec![vec![1, -2], vec![2, 3], vec![-3]]).unwrap()
}

#[test]
fn write_read_preserves_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.dimacs");
    let cnf = sample_cnf();

    write_dimacs(&path, &cnf).unwrap();
    let loaded = read_dimacs(&path).unwrap();
    assert_eq!(loaded, cnf);
}

#[test]
fn randomized_variant_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("variant.dimacs");
    let variant = sample_cnf().randomize(123).unwrap();

    write_dimacs(&path, &variant).unwrap();
    let loaded = read_dimacs(&path).unwrap();
    assert_eq!(loaded, variant);
}

#[test]
fn randomization_is_byte_identical_across_invocations() {
    let dir = tempdir().unwrap();
    let cnf = sample_cnf();

    let first = dir.path().join("first.dimacs");
    let second = dir.path().join("second.dimacs");
    write_dimacs(&first, &cnf.randomize(77).unwrap()).unwrap();
    write_dimacs(&second, &cnf.randomize(77).unwrap()).unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn files_without_name_comments_get_synthetic_names() {
    let cnf = parse_dimacs("p cnf 2 1\n1 2 0\n").unwrap();
    assert_eq!(cnf.variables().name(1), Some("x1"));
    assert_eq!(cnf.variables().name(2), Some("x2"));
}
