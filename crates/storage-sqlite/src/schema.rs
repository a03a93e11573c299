diesel::table! {
    budgets (id) {
        id -> BigInt,
        category_id -> BigInt,
        amount_limit -> Text,
        month -> Integer,
        year -> Integer,
        user_id -> BigInt,
        synced -> Bool,
        server_id -> Nullable<BigInt>,
        local_id -> BigInt,
    }
}

diesel::table! {
    categories (id) {
        id -> BigInt,
        name -> Text,
        synced -> Bool,
        server_id -> Nullable<BigInt>,
        local_id -> BigInt,
    }
}

diesel::table! {
    contributions (id) {
        id -> BigInt,
        goal_id -> BigInt,
        amount -> Text,
        created_at -> Text,
        synced -> Bool,
        server_id -> Nullable<BigInt>,
        local_id -> BigInt,
    }
}

diesel::table! {
    expenses (id) {
        id -> BigInt,
        description -> Text,
        amount -> Text,
        category_id -> BigInt,
        occurred_at -> Text,
        user_id -> BigInt,
        synced -> Bool,
        server_id -> Nullable<BigInt>,
        local_expense_id -> BigInt,
    }
}

diesel::table! {
    savings_goals (id) {
        id -> BigInt,
        name -> Text,
        target_amount -> Text,
        current_amount -> Text,
        target_date -> Nullable<Text>,
        user_id -> BigInt,
        synced -> Bool,
        server_id -> Nullable<BigInt>,
        local_id -> BigInt,
    }
}

diesel::joinable!(budgets -> categories (category_id));
diesel::joinable!(contributions -> savings_goals (goal_id));
diesel::joinable!(expenses -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    budgets,
    categories,
    contributions,
    expenses,
    savings_goals,
);
