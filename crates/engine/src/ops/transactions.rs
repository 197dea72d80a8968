use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionListFilter, TransactionSort, accounts,
    transactions,
};

use super::Engine;

impl Engine {
    /// Lists ledger entries for an account with kind/date filters.
    ///
    /// Returns the page plus the total count matching the filter, so callers
    /// can paginate.
    pub async fn transactions_for_account(
        &self,
        account_id: Uuid,
        filter: &TransactionListFilter,
        limit: u64,
        offset: u64,
    ) -> ResultEngine<(Vec<Transaction>, u64)> {
        // Existence check so an unknown account is a 404, not an empty page.
        accounts::Entity::find_by_id(account_id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.to_string()));
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::CreatedAt.lte(to));
        }

        let total = query.clone().count(self.database()).await?;

        query = match filter.sort {
            TransactionSort::DateDesc => query.order_by_desc(transactions::Column::CreatedAt),
            TransactionSort::DateAsc => query.order_by_asc(transactions::Column::CreatedAt),
            TransactionSort::AmountDesc => query.order_by_desc(transactions::Column::AmountMinor),
            TransactionSort::AmountAsc => query.order_by_asc(transactions::Column::AmountMinor),
        };

        let models = query
            .limit(limit)
            .offset(offset)
            .all(self.database())
            .await?;
        let rows = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((rows, total))
    }

    /// Return a ledger [`Transaction`] by its identifier.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }
}
