#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlInsertInto,
    SqlInsertIntoOnConflict,
    SqlInsertIntoValues,
    SqlJoin,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlSubquery,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub fragment: Fragment,
    pub qualify_columns: bool,
}

impl Context {
    pub fn new(fragment: Fragment, qualify_columns: bool) -> Self {
        Self {
            fragment,
            qualify_columns,
        }
    }

    pub fn switch_fragment(&self, fragment: Fragment) -> Context {
        Context { fragment, ..*self }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Fragment::None, true)
    }
}
