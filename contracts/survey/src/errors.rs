use soroban_sdk::contracterror;

/// Every failure the ledger can surface. All of them abort the whole call;
/// nothing is recovered internally, so no invariant is ever observed broken.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SurveyError {
    // lifecycle of the contract itself
    NotInitialized = 1,
    AlreadyInitialized = 2,

    // creation-time validation
    InvalidOptionCount = 3,
    DuplicateOption = 4,
    DurationTooShort = 5,
    InvalidRewardPool = 6,
    InvalidReward = 7,
    InvalidDeposit = 8,

    // lookups and state guards
    SurveyNotFound = 9,
    SurveyClosed = 10,
    SurveyStillOpen = 11,
    ResultsNotReleased = 12,
    OptionNotSettled = 13,

    // per-call validation
    AlreadyVoted = 14,
    InsufficientDeposit = 15,
    InvalidOption = 16,
    InvalidCiphertext = 17,

    // authorization / duplicate actions on funds
    NotCreator = 18,
    HasNotVoted = 19,
    AlreadyWithdrawn = 20,
    RewardPoolDrained = 21,

    // custody
    InsufficientCustody = 22,
}
