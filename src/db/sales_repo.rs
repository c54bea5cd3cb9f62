// src/db/sales_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::sales::SalesRow};

// O repositório de vendas, responsável pela única consulta do sistema:
// a leitura das cinco colunas da tabela 'sales'. Nada é escrito no banco.
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca todas as transações de venda, sem filtro algum.
    // A coluna de data vem como texto porque a origem não garante o tipo;
    // o parsing acontece no loader (services::loader).
    pub async fn fetch_all(&self) -> Result<Vec<SalesRow>, AppError> {
        let rows = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT
                invoicedate::text AS invoicedate,
                invoicenumber,
                locationname,
                pharmacistname,
                netrevenueamount
            FROM sales
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
