use super::{Formatter, Ident, ToSql};

use crate::stmt::{ColumnDef, ColumnTy};

impl ToSql for &ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let ty = match &self.ty {
            ColumnTy::Mapped(ty) => ty.name(f.dialect.flavor()),
            ColumnTy::Raw(raw) => raw.as_str(),
        };
        let primary_key = self.primary_key.then_some(" PRIMARY KEY");
        let not_null = self.not_null.then_some(" NOT NULL");

        fmt!(f, Ident(&self.name) " " ty primary_key not_null);
    }
}
