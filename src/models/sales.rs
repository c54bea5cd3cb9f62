// src/models/sales.rs

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::FromRow;

// Uma linha crua da tabela 'sales', exatamente como o banco a devolve.
// Tudo é opcional aqui: a origem tem valores faltando e a data pode vir
// em formatos diferentes. A validação acontece uma única vez, no loader.
#[derive(Debug, Clone, FromRow)]
pub struct SalesRow {
    pub invoicedate: Option<String>,
    pub invoicenumber: Option<String>,
    pub locationname: Option<String>,
    pub pharmacistname: Option<String>,
    pub netrevenueamount: Option<Decimal>,
}

// Uma transação já limpa e tipada. Invariantes garantidas pelo loader:
// - `location` e `pharmacist` nunca são vazios ("Unknown" no lugar);
// - `pharmacist` tem no máximo as duas primeiras palavras do nome;
// - `net_revenue` de faturas de devolução já vem com o sinal invertido,
//   exatamente uma vez, nunca de novo depois da carga.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDateTime,
    pub invoice_number: String,
    pub location: String,
    pub pharmacist: String,
    pub net_revenue: Decimal,
}

impl Transaction {
    /// O dia-calendário da transação, usado em todos os agrupamentos diários.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}
