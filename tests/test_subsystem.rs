//! Test suite concerning the resolution of MCOS objects through the public interface.

use binrw::Endian;
use once_cell::sync::Lazy;
use std::sync::Mutex;

use matobj::*;

#[path = "fixtures.rs"]
mod fixtures;

use crate::fixtures::{
    StubReader, SubsystemFixture, object_reference, opaque_variable,
};

/// Shared load of a 2x3 `YesConstructor` object array.
static OBJECT_ARRAY_FILE: Lazy<Mutex<MatFile>> = Lazy::new(|| {
    let mut fixture = SubsystemFixture::new(&["YesConstructor", "a", "b", "c"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = (1..=6).map(|i| (1, 0, i, 0)).collect();
    fixture.type2_blocks = (0..6)
        .map(|_| vec![(2, 1, 0), (3, 1, 1), (4, 1, 2)])
        .collect();
    fixture.prop_values = vec![
        MatVariable::from(10.0),
        MatVariable::from(20.0),
        MatVariable::from(30.0),
    ];

    let ids: Vec<u32> = (1..=6).collect();
    let var = opaque_variable("YesConstructor", object_reference(&[2, 3], &ids, 1));
    Mutex::new(load(&fixture, vec![("obj6", var)], &LoadOptions::default()))
});

fn load(
    fixture: &SubsystemFixture,
    vars: Vec<(&str, MatVariable)>,
    opts: &LoadOptions,
) -> MatFile {
    let mut matfile = MatFile::new();
    for (name, value) in vars {
        matfile.insert(name, value);
    }
    let workspace = fixture.workspace(Endian::Little);
    let mut reader = StubReader::with_subsystem(matfile, Endian::Little, workspace);
    load_matfile_objects("test.mat", &mut reader, opts).expect("load failed")
}

fn expect_object(value: &MatVariable) -> &ObjectArray {
    match value {
        MatVariable::Object(obj) => obj,
        other => panic!("expected resolved object, got {}", other),
    }
}

#[test]
/// A file without a subsystem passes through the primitive result unchanged.
fn no_subsystem_short_circuits() {
    let mut matfile = MatFile::new();
    matfile.insert("var_int", MatVariable::from(10.0));

    let mut reader = StubReader::without_subsystem(matfile);
    let result =
        load_matfile_objects("var_int.mat", &mut reader, &LoadOptions::default()).unwrap();

    assert_eq!(result["var_int"].to_f64(), Some(10.0));
    assert_eq!(result["var_int"].dim(), vec![1, 1]);
}

#[test]
/// Object whose constructor sets nothing: all properties come through empty.
fn object_without_constructor() {
    let mut fixture = SubsystemFixture::new(&["NoConstructor", "a", "b", "c"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(2, 1, 0), (3, 1, 1), (4, 1, 2)]];
    fixture.prop_values = vec![
        MatVariable::NumericArray(NumericArray::empty()),
        MatVariable::NumericArray(NumericArray::empty()),
        MatVariable::NumericArray(NumericArray::empty()),
    ];

    let var = opaque_variable("NoConstructor", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("obj1", var)], &LoadOptions::default());

    let obj = expect_object(&result["obj1"]);
    assert_eq!(obj.class_name, "NoConstructor");
    assert_eq!(obj.dim, vec![1, 1]);

    let props = obj.prop(0).unwrap();
    assert_eq!(props.fieldnames(), vec!["a", "b", "c"]);
    for field in ["a", "b", "c"] {
        assert!(props.get(field).unwrap().is_empty_value());
    }
}

#[test]
/// Object with constructor-set values.
fn object_with_constructor() {
    let mut fixture = SubsystemFixture::new(&["YesConstructor", "a", "b", "c"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(2, 1, 0), (3, 1, 1), (4, 1, 2)]];
    fixture.prop_values = vec![
        MatVariable::from(10.0),
        MatVariable::from(20.0),
        MatVariable::from(30.0),
    ];

    let var = opaque_variable("YesConstructor", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("obj2", var)], &LoadOptions::default());

    let obj = expect_object(&result["obj2"]);
    assert_eq!(obj.class_name, "YesConstructor");

    let props = obj.prop(0).unwrap();
    assert_eq!(props.get("a").unwrap().to_f64(), Some(10.0));
    assert_eq!(props.get("b").unwrap().to_f64(), Some(20.0));
    assert_eq!(props.get("c").unwrap().to_f64(), Some(30.0));
}

#[test]
/// Class defaults fill in properties the instance does not set.
fn object_with_defaults() {
    let mut fixture = SubsystemFixture::new(&["DefaultClass", "a", "b", "c"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(3, 1, 0)]];
    fixture.prop_values = vec![MatVariable::from(10.0)];

    let mut defaults = Structure::empty();
    defaults.insert("a", MatVariable::NumericArray(NumericArray::empty()));
    defaults.insert("c", MatVariable::from(30.0));
    fixture.defaults = vec![defaults];

    let var = opaque_variable("DefaultClass", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("obj3", var)], &LoadOptions::default());

    let obj = expect_object(&result["obj3"]);
    let props = obj.prop(0).unwrap();

    // Every defaulted name appears; instance values win
    assert!(props.get("a").unwrap().is_empty_value());
    assert_eq!(props.get("b").unwrap().to_f64(), Some(10.0));
    assert_eq!(props.get("c").unwrap().to_f64(), Some(30.0));
}

#[test]
/// A 2x3 object array resolves each id and keeps the sentinel's shape.
fn object_array_shape() {
    let matfile = OBJECT_ARRAY_FILE.lock().unwrap();

    let obj = expect_object(&matfile["obj6"]);
    assert_eq!(obj.class_name, "YesConstructor");
    assert_eq!(obj.dim, vec![2, 3]);
    assert_eq!(obj.props.len(), 6);
    assert_eq!(obj.prop_multidim(&[1, 2]), obj.prop(5));
}

#[test]
/// Every element of an object array carries the full property set.
fn object_array_elements() {
    let matfile = OBJECT_ARRAY_FILE.lock().unwrap();

    let obj = expect_object(&matfile["obj6"]);
    for idx in 0..6 {
        let props = obj.prop(idx).unwrap();
        assert_eq!(props.get("a").unwrap().to_f64(), Some(10.0));
        assert_eq!(props.get("b").unwrap().to_f64(), Some(20.0));
        assert_eq!(props.get("c").unwrap().to_f64(), Some(30.0));
    }
}

#[test]
/// Nested references inside property values: direct, in a cell, in a struct field.
fn nested_object_properties() {
    let mut fixture = SubsystemFixture::new(&[
        "NestedClass",
        "NoConstructor",
        "objProp",
        "cellProp",
        "structProp",
        "a",
    ]);
    fixture.classes = vec![(0, 1), (0, 2)];
    fixture.objects = vec![(1, 0, 1, 0), (2, 0, 2, 0)];
    fixture.type2_blocks = vec![vec![(3, 1, 0), (4, 1, 1), (5, 1, 2)], vec![(6, 1, 3)]];

    let inner_ref = object_reference(&[1, 1], &[2], 2);
    let cell_prop = MatVariable::CellArray(
        CellArray::new(vec![1, 1], vec![inner_ref.clone()]).unwrap(),
    );
    let mut struct_prop = Structure::empty();
    struct_prop.insert("ObjField", inner_ref.clone());

    fixture.prop_values = vec![
        inner_ref,
        cell_prop,
        MatVariable::Structure(struct_prop),
        MatVariable::NumericArray(NumericArray::empty()),
    ];

    let var = opaque_variable("NestedClass", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("obj4", var)], &LoadOptions::default());

    let obj = expect_object(&result["obj4"]);
    let props = obj.prop(0).unwrap();

    let inner = expect_object(props.get("objProp").unwrap());
    assert_eq!(inner.class_name, "NoConstructor");

    let MatVariable::CellArray(cell) = props.get("cellProp").unwrap() else {
        panic!("cellProp is not a cell");
    };
    assert_eq!(
        expect_object(&cell.value[0]).class_name,
        "NoConstructor"
    );

    let MatVariable::Structure(nested) = props.get("structProp").unwrap() else {
        panic!("structProp is not a struct");
    };
    assert_eq!(
        expect_object(nested.get("ObjField").unwrap()).class_name,
        "NoConstructor"
    );
}

#[test]
/// Handle instances attach under synthetic `_Handle_{i}` keys.
fn handle_attachment() {
    let mut fixture = SubsystemFixture::new(&["Outer", "HandleClass", "x"]);
    fixture.classes = vec![(0, 1), (0, 2)];
    fixture.objects = vec![(1, 0, 1, 1), (2, 0, 2, 0)];
    fixture.type2_blocks = vec![vec![(3, 1, 0)], vec![]];
    fixture.handle_blocks = vec![vec![2]];
    fixture.prop_values = vec![MatVariable::from(5.0)];

    let var = opaque_variable("Outer", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("h", var)], &LoadOptions::default());

    let obj = expect_object(&result["h"]);
    let props = obj.prop(0).unwrap();
    assert_eq!(props.get("x").unwrap().to_f64(), Some(5.0));

    let handle = expect_object(props.get("_Handle_1").unwrap());
    assert_eq!(handle.class_name, "HandleClass");
    assert_eq!(handle.dim, vec![1, 1]);
}

#[test]
/// Handle classes report their two-part name.
fn handle_class_name_prefix() {
    let mut fixture = SubsystemFixture::new(&["pkg", "Inner"]);
    fixture.classes = vec![(1, 2)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![]];

    let var = opaque_variable("pkg.Inner", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("v", var)], &LoadOptions::default());

    assert_eq!(expect_object(&result["v"]).class_name, "pkg.Inner");
}

#[test]
/// Defaults referencing their own class terminate with a placeholder instead of looping.
fn cyclic_default_reference_breaks() {
    let mut fixture = SubsystemFixture::new(&["SelfRef", "this"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![]];

    let mut defaults = Structure::empty();
    defaults.insert("this", object_reference(&[1, 1], &[1], 1));
    fixture.defaults = vec![defaults];

    let var = opaque_variable("SelfRef", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("v", var)], &LoadOptions::default());

    let obj = expect_object(&result["v"]);
    let inner = expect_object(obj.prop(0).unwrap().get("this").unwrap());
    assert_eq!(inner.class_name, "SelfRef");
    assert!(inner.prop(0).unwrap().is_empty());
}

#[test]
/// Unknown type systems are skipped with the placeholder left in place.
fn unknown_type_system_is_skipped() {
    let mut fixture = SubsystemFixture::new(&["SomeClass"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![]];

    let java_var = MatVariable::Opaque(OpaqueVariable {
        type_system: "java".to_string(),
        class_name: "java.lang.String".to_string(),
        metadata: Box::new(MatVariable::NumericArray(NumericArray::empty())),
    });
    let result = load(&fixture, vec![("j", java_var)], &LoadOptions::default());

    assert!(matches!(result["j"], MatVariable::Opaque(_)));
}

#[test]
/// Plain u32 data beginning with the sentinel magic stays numeric data.
fn magic_prefixed_data_is_not_a_reference() {
    let mut fixture = SubsystemFixture::new(&["SomeClass"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![]];

    let data = vec![0xDD00_0000u32, 5, 1, 2, 3, 4];
    let plain = MatVariable::NumericArray(
        NumericArray::new(vec![6, 1], MatlabType::from(data.clone()), None).unwrap(),
    );
    let result = load(&fixture, vec![("plain", plain)], &LoadOptions::default());

    assert_eq!(result["plain"].to_vec_u32(), Some(data));
}

#[test]
/// Property field kinds outside {1, 2} abort the load.
fn unknown_field_kind_fails() {
    let mut fixture = SubsystemFixture::new(&["BadClass", "a"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(2, 3, 0)]];
    fixture.prop_values = vec![MatVariable::from(1.0)];

    let mut matfile = MatFile::new();
    matfile.insert(
        "bad",
        opaque_variable("BadClass", object_reference(&[1, 1], &[1], 1)),
    );
    let workspace = fixture.workspace(Endian::Little);
    let mut reader = StubReader::with_subsystem(matfile, Endian::Little, workspace);

    let result = load_matfile_objects("bad.mat", &mut reader, &LoadOptions::default());
    assert!(matches!(result, Err(MatObjError::UnknownFieldKind(3))));
}

#[test]
/// Boolean attribute properties (field kind 2) decode to logical scalars.
fn boolean_attribute_property() {
    let mut fixture = SubsystemFixture::new(&["FlagClass", "enabled", "disabled"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(2, 2, 1), (3, 2, 0)]];

    let var = opaque_variable("FlagClass", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("f", var)], &LoadOptions::default());

    let obj = expect_object(&result["f"]);
    let props = obj.prop(0).unwrap();
    assert_eq!(props.get("enabled").unwrap().to_bool(), Some(true));
    assert_eq!(props.get("disabled").unwrap().to_bool(), Some(false));
}

#[test]
/// `raw_data` keeps every class raw, including the ones with converters.
fn raw_data_disables_conversion() {
    let mut fixture = SubsystemFixture::new(&["datetime", "data"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = vec![(1, 0, 1, 0)];
    fixture.type2_blocks = vec![vec![(2, 1, 0)]];
    fixture.prop_values = vec![MatVariable::from((1.0e12, 0.0))];

    let opts = LoadOptions {
        raw_data: true,
        ..LoadOptions::default()
    };
    let var = opaque_variable("datetime", object_reference(&[1, 1], &[1], 1));
    let result = load(&fixture, vec![("t", var)], &opts);

    let obj = expect_object(&result["t"]);
    assert_eq!(obj.class_name, "datetime");
    assert_eq!(obj.prop(0).unwrap().get("data").unwrap().to_f64(), Some(1.0e12));
}

#[test]
/// Enumeration without stored values: names resolve, values stay empty.
fn enumeration_without_values() {
    let mut fixture = SubsystemFixture::new(&["Colors", "red", "green", "blue"]);
    fixture.classes = vec![(0, 1)];

    let mut metadata = Structure::empty();
    metadata.insert("EnumerationInstanceTag", MatVariable::from(0xDD00_0000u32));
    metadata.insert("ClassName", MatVariable::from(1u32));
    metadata.insert("BuiltinClassName", MatVariable::from(0u32));
    metadata.insert(
        "ValueNames",
        MatVariable::NumericArray(
            NumericArray::new(vec![3, 1], MatlabType::from(vec![2u32, 3, 4]), None).unwrap(),
        ),
    );
    metadata.insert(
        "ValueIndices",
        MatVariable::NumericArray(
            NumericArray::new(vec![3, 1], MatlabType::from(vec![0u32, 1, 2]), None).unwrap(),
        ),
    );
    metadata.insert(
        "Values",
        MatVariable::NumericArray(NumericArray::empty()),
    );

    let var = opaque_variable("Colors", MatVariable::Structure(metadata));
    let result = load(&fixture, vec![("e", var)], &LoadOptions::default());

    let MatVariable::Enumeration(en) = &result["e"] else {
        panic!("expected enumeration instance");
    };
    assert_eq!(en.class_name, "Colors");
    assert_eq!(en.builtin_class_name, None);
    assert_eq!(en.dim, vec![3, 1]);
    assert_eq!(en.value_names, vec!["red", "green", "blue"]);
    assert!(en.values.is_empty());
}

#[test]
/// Enumeration with stored values: indices remap into the value cell, shapes agree.
fn enumeration_with_values() {
    let mut fixture = SubsystemFixture::new(&["Colors", "red", "green", "blue", "level"]);
    fixture.classes = vec![(0, 1)];
    fixture.objects = (1..=3).map(|i| (1, 0, i, 0)).collect();
    fixture.type2_blocks = (0..3).map(|_| vec![(5, 1, 0)]).collect();
    fixture.prop_values = vec![MatVariable::from(7.0)];

    let values = CellArray::new(
        vec![3, 1],
        vec![
            object_reference(&[1, 1], &[1], 1),
            object_reference(&[1, 1], &[2], 1),
            object_reference(&[1, 1], &[3], 1),
        ],
    )
    .unwrap();

    let mut metadata = Structure::empty();
    metadata.insert("EnumerationInstanceTag", MatVariable::from(0xDD00_0000u32));
    metadata.insert("ClassName", MatVariable::from(1u32));
    metadata.insert("BuiltinClassName", MatVariable::from(0u32));
    metadata.insert(
        "ValueNames",
        MatVariable::NumericArray(
            NumericArray::new(vec![3, 1], MatlabType::from(vec![2u32, 3, 4]), None).unwrap(),
        ),
    );
    metadata.insert(
        "ValueIndices",
        MatVariable::NumericArray(
            NumericArray::new(vec![3, 1], MatlabType::from(vec![2u32, 1, 0]), None).unwrap(),
        ),
    );
    metadata.insert("Values", MatVariable::CellArray(values));

    let var = opaque_variable("Colors", MatVariable::Structure(metadata));
    let result = load(&fixture, vec![("e", var)], &LoadOptions::default());

    let MatVariable::Enumeration(en) = &result["e"] else {
        panic!("expected enumeration instance");
    };
    assert_eq!(en.values.len(), en.value_names.len());
    assert_eq!(en.dim, vec![3, 1]);
    for value in &en.values {
        let MatVariable::Structure(props) = value else {
            panic!("expected property map per enumeration value");
        };
        assert_eq!(props.get("level").unwrap().to_f64(), Some(7.0));
    }
}
