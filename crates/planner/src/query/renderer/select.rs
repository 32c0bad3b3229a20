use crate::query::{
    ast::{common::OrderDir, select::Select},
    renderer::Render,
};

impl Render for Select {
    fn render(&self, r: &mut super::Renderer) {
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        if let Some(from) = &self.from {
            r.sql.push_str(" FROM ");
            r.render_table_ref(&from.table);
            if let Some(alias) = &from.alias {
                r.sql.push_str(" AS ");
                r.push_identifier(alias);
            }
        }

        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.expr.render(r);
                match order.direction {
                    Some(OrderDir::Asc) => r.sql.push_str(" ASC"),
                    Some(OrderDir::Desc) => r.sql.push_str(" DESC"),
                    None => {}
                }
            }
        }
    }
}
