//! Creditor bank accounts service.

use std::sync::Arc;

use crate::client::paginated::{CursorPager, ListPage, PaginatedStream};
use crate::client::{ClientInner, RequestOptions, Resource};
use crate::models::{
    CreateCreditorBankAccountParams, CreditorBankAccount, CreditorBankAccountId,
    ListCreditorBankAccountsParams,
};
use crate::Result;

const PATH: &str = "creditor_bank_accounts";

impl Resource for CreditorBankAccount {
    const ENVELOPE_KEY: &'static str = PATH;
}

/// One page of creditor bank accounts.
pub type CreditorBankAccountList = ListPage<CreditorBankAccount>;

/// Service for creditor bank account operations.
///
/// Creditor bank accounts hold the details of the accounts payouts are sent
/// to. Accounts can be created, listed, fetched and disabled; a disabled
/// account is re-enabled by creating a new one with the same details.
///
/// # Example
///
/// ```no_run
/// use gocardless_rs::models::{CreateCreditorBankAccountParams, ListCreditorBankAccountsParams};
///
/// # async fn example(client: gocardless_rs::GoCardlessClient) -> gocardless_rs::Result<()> {
/// let service = client.creditor_bank_accounts();
///
/// let created = service
///     .create(
///         &CreateCreditorBankAccountParams::new("CR123")
///             .account_holder_name("Nude Wines")
///             .iban("GB60BARC20000055779911"),
///         None,
///     )
///     .await?;
///
/// let page = service.list(&ListCreditorBankAccountsParams::default(), None).await?;
/// println!("{} accounts on the first page", page.len());
///
/// service.disable(&created.id, None).await?;
/// # Ok(())
/// # }
/// ```
pub struct CreditorBankAccountsService {
    inner: Arc<ClientInner>,
}

impl CreditorBankAccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a new creditor bank account.
    ///
    /// An idempotency key is generated unless one is given in `options`;
    /// retries reuse it, so a retried create cannot open a second account.
    pub async fn create(
        &self,
        params: &CreateCreditorBankAccountParams,
        options: Option<RequestOptions>,
    ) -> Result<CreditorBankAccount> {
        self.inner.post(&[PATH], Some(params), options.as_ref()).await
    }

    /// Get one page of creditor bank accounts.
    pub async fn list(
        &self,
        params: &ListCreditorBankAccountsParams,
        options: Option<RequestOptions>,
    ) -> Result<CreditorBankAccountList> {
        self.inner.list(&[PATH], params, options.as_ref()).await
    }

    /// Page through all creditor bank accounts matching `params`.
    ///
    /// Nothing is fetched until [`CursorPager::value`] is called. Any `after`
    /// cursor in `params` is replaced by the pager's own cursor.
    pub fn all(
        &self,
        params: ListCreditorBankAccountsParams,
        options: Option<RequestOptions>,
    ) -> CursorPager<CreditorBankAccount> {
        let inner = self.inner.clone();

        CursorPager::new(move |cursor: Option<String>| {
            let inner = inner.clone();
            let options = options.clone();
            let params = ListCreditorBankAccountsParams {
                after: cursor,
                ..params.clone()
            };

            Box::pin(async move {
                inner
                    .list::<CreditorBankAccount, _>(&[PATH], &params, options.as_ref())
                    .await
            })
        })
    }

    /// Stream all creditor bank accounts matching `params`, one record at a
    /// time.
    ///
    /// Pages are fetched lazily as the stream is polled, so this is more
    /// memory-efficient than collecting pages for large result sets.
    pub fn list_stream(
        &self,
        params: ListCreditorBankAccountsParams,
        options: Option<RequestOptions>,
    ) -> PaginatedStream<CreditorBankAccount> {
        self.all(params, options).into_stream()
    }

    /// Get a creditor bank account by ID.
    pub async fn get(
        &self,
        id: &CreditorBankAccountId,
        options: Option<RequestOptions>,
    ) -> Result<CreditorBankAccount> {
        self.inner.get(&[PATH, id.as_str()], options.as_ref()).await
    }

    /// Disable a creditor bank account. No money can be paid out to a
    /// disabled account.
    ///
    /// Disabling an already-disabled account fails with an API error whose
    /// reason is `disable_failed` (see [`ApiError::has_reason`](crate::ApiError::has_reason)).
    pub async fn disable(
        &self,
        id: &CreditorBankAccountId,
        options: Option<RequestOptions>,
    ) -> Result<CreditorBankAccount> {
        self.inner
            .post::<_, ()>(&[PATH, id.as_str(), "actions", "disable"], None, options.as_ref())
            .await
    }
}
