use chrono::{Duration, Utc};
use sea_orm::{
    DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Account, AccountType, EngineError, ResultEngine, TransactionKind, accounts, transactions,
};

use super::{Engine, with_tx};

/// Window used for the per-account activity summary.
const SUMMARY_WINDOW_DAYS: i64 = 30;

/// Recent-activity totals for one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountSummary {
    pub balance_minor: i64,
    pub total_deposits_minor: i64,
    pub total_withdrawals_minor: i64,
    pub transaction_count: u64,
    pub window_days: i64,
}

impl Engine {
    /// Opens a new account. The account number must be unique.
    pub async fn new_account(
        &self,
        account_number: &str,
        account_name: &str,
        account_type: AccountType,
        opening_balance_minor: i64,
    ) -> ResultEngine<Account> {
        let account = Account::new(
            account_number.trim().to_string(),
            account_name.trim().to_string(),
            account_type,
            opening_balance_minor,
            Utc::now(),
        )?;

        with_tx!(self, |db_tx| {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::AccountNumber.eq(account.account_number.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                Err(EngineError::ExistingKey(account.account_number.clone()))
            } else {
                accounts::ActiveModel::from(&account).insert(&db_tx).await?;
                Ok(account.clone())
            }
        })
    }

    /// Return an [`Account`] by its identifier.
    pub async fn account(&self, account_id: Uuid) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(account_id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        Account::try_from(model)
    }

    /// Return an [`Account`] by its account number.
    pub async fn account_by_number(&self, account_number: &str) -> ResultEngine<Account> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        Account::try_from(model)
    }

    /// Lists accounts ordered by account number.
    pub async fn accounts(&self, limit: u64, offset: u64) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::AccountNumber)
            .limit(limit)
            .offset(offset)
            .all(self.database())
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Returns `true` iff the account exists and holds at least
    /// `amount_minor`.
    ///
    /// Read-only; the executor re-evaluates the same predicate inside its
    /// transaction before debiting, so check and mutation cannot be
    /// interleaved by a conflicting transfer.
    pub async fn sufficient_funds(&self, account_id: Uuid, amount_minor: i64) -> ResultEngine<bool> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let model = accounts::Entity::find_by_id(account_id.to_string())
            .one(self.database())
            .await?;
        Ok(model.is_some_and(|account| account.balance_minor >= amount_minor))
    }

    /// Returns balance plus per-kind ledger totals over the last 30 days.
    pub async fn account_summary(&self, account_id: Uuid) -> ResultEngine<AccountSummary> {
        let account = self.account(account_id).await?;
        let cutoff = Utc::now() - Duration::days(SUMMARY_WINDOW_DAYS);

        let recent = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.to_string()))
            .filter(transactions::Column::CreatedAt.gte(cutoff));

        let transaction_count = recent.clone().count(self.database()).await?;
        let total_deposits_minor = sum_amount(
            recent.clone().filter(transactions::Column::Kind.eq(TransactionKind::Deposit.as_str())),
            self.database(),
        )
        .await?;
        let total_withdrawals_minor = sum_amount(
            recent.filter(
                transactions::Column::Kind.is_in([
                    TransactionKind::Withdrawal.as_str(),
                    TransactionKind::Transfer.as_str(),
                ]),
            ),
            self.database(),
        )
        .await?;

        Ok(AccountSummary {
            balance_minor: account.balance_minor,
            total_deposits_minor,
            total_withdrawals_minor,
            transaction_count,
            window_days: SUMMARY_WINDOW_DAYS,
        })
    }
}

async fn sum_amount(
    query: Select<transactions::Entity>,
    db: &DatabaseConnection,
) -> ResultEngine<i64> {
    let sum: Option<Option<i64>> = query
        .select_only()
        .column_as(Expr::col(transactions::Column::AmountMinor).sum(), "sum")
        .into_tuple()
        .one(db)
        .await?;
    Ok(sum.flatten().unwrap_or(0))
}
