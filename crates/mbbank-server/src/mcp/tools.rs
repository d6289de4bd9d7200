//! MCP Tool implementations for MB Bank
//!
//! Re-exports from mbbank_core::tools for MCP server use.
//! The actual implementations live in mbbank-core so the normalizers stay
//! testable without a transport.

// Re-export all tool types and functions from mbbank-core
pub use mbbank_core::tools::{
    // Functions
    bank_tools,
    get_balances,
    get_card_transactions,
    get_cards,
    get_interest_rates,
    get_saving_details,
    get_savings,
    get_today_date,
    get_transactions,
    // Params types
    CardTransactionsParams,
    InterestRatesParams,
    SavingDetailsParams,
    ToolSpec,
    TransactionsParams,
};

// Result types
pub use mbbank_core::models::{
    BalancesResult, CardTransactionsResult, CardsResult, InterestRatesResult, SavingDetailResult,
    SavingsResult, TransactionsResult,
};
