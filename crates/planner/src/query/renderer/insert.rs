use crate::query::{ast::insert::Insert, renderer::Render};

impl Render for Insert {
    fn render(&self, r: &mut super::Renderer) {
        // 1. INSERT INTO table (...)
        r.sql.push_str("INSERT INTO ");
        r.render_table_ref(&self.table);
        r.sql.push_str(" (");
        r.push_identifier_list(&self.columns);
        r.sql.push(')');

        // 2. VALUES (...), (...)
        r.sql.push_str(" VALUES ");
        for (i, row) in self.values.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            r.sql.push('(');
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    r.sql.push_str(", ");
                }
                val.render(r);
            }
            r.sql.push(')');
        }
    }
}
