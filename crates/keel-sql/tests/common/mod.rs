use keel_core::{
    schema::{ColumnDescriptor, EntityDescriptor, FieldAccessor, FieldDescriptor, IndexDescriptor},
    stmt::{Type, Value},
    EntityMetadata,
};

#[derive(Debug, Default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: i64,
}

fn ignore(_: &mut User, _: Value) -> keel_core::Result<()> {
    Ok(())
}

fn field(
    name: &'static str,
    column: ColumnDescriptor,
    ty: Type,
    get: fn(&User) -> keel_core::Result<Value>,
) -> FieldDescriptor<User> {
    FieldDescriptor {
        name,
        id: false,
        column: Some(column),
        index: None,
        ty,
        accessor: FieldAccessor::new(get, ignore),
    }
}

/// `users(id, name NOT NULL, email VARCHAR(320) UNIQUE, age)` with a
/// composite index on `(name, age)`.
pub fn users() -> EntityMetadata<User> {
    let mut id = field("id", ColumnDescriptor::new("id"), Type::I64, |u| {
        Ok(Value::I64(u.id))
    });
    id.id = true;

    let name = field(
        "name",
        ColumnDescriptor {
            nullable: false,
            ..ColumnDescriptor::new("name")
        },
        Type::String,
        |u| Ok(Value::from(&u.name)),
    );

    let mut email = field(
        "email",
        ColumnDescriptor {
            raw_type: Some("VARCHAR(320)"),
            ..ColumnDescriptor::new("email")
        },
        Type::String,
        |u| Ok(Value::from(u.email.clone())),
    );
    email.index = Some(IndexDescriptor {
        unique: true,
        ..IndexDescriptor::default()
    });

    let age = field("age", ColumnDescriptor::new("age"), Type::I64, |u| {
        Ok(Value::I64(u.age))
    });

    EntityMetadata::from_descriptor(EntityDescriptor {
        name: "users",
        fields: vec![id, name, email, age],
        indexes: vec![IndexDescriptor {
            name: Some("idx_users_name_age"),
            columns: vec!["name", "age"],
            unique: false,
        }],
        instance: Some(User::default),
    })
    .unwrap()
}
