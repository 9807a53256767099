/*!

This is the long-form manual for `candidate_stats` and `partyinsights`.

## Data

Each row describes one candidate in one election of one constituency:

| column          | content                                                      |
|-----------------|--------------------------------------------------------------|
| `State`         | the region (state, province) of the election                 |
| `Year`          | the election year                                            |
| `Constituency`  | the constituency name                                        |
| `Party`         | the party name (independents are a party of their own)      |
| `Criminal_Case` | the number of declared criminal cases, may be empty          |
| `Total_Assets`  | the declared assets, in a single currency                    |
| `Education`     | the declared education level, see below                      |

The education levels are, in this order: `Illiterate`, `Literate`, `5th Pass`,
`8th Pass`, `10th Pass`, `12th Pass`, `Diploma`, `Graduate`,
`Graduate Professional`, `Post Graduate`, `Doctorate`, `Others`, `Not Given`.
An empty cell is `Not Given`. Any other value is rejected when loading.

## Input formats

* `csv` Comma separated values with a header row. The column names above are
  the defaults and can be changed per source in the configuration.
* `json` An array of objects using the same names as keys.
* `excel` The first worksheet of an Excel (.xlsx) file, or the worksheet named
  with `excelWorksheetName`.

## Selections

A selection is one region and a set of years. The region drives the years that
can be chosen:

* an unknown region is replaced by the first region in alphabetical order,
* years without any candidate in the region are dropped,
* if no year is left (or none was asked for), the latest year of the region is
  used.

Every correction is reported next to the results.

## Rules

| option               | default       | meaning                                                    |
|----------------------|---------------|------------------------------------------------------------|
| `majorPartyCount`    | 6             | how many parties are major                                 |
| `majorPartyMinTotal` | 0             | a major party has strictly more criminal cases than this   |
| `caseThreshold`      | 3             | detail views only count candidates with more cases         |
| `partyChartLimit`    | 18            | number of parties in each party ranking                    |
| `missingCasesPolicy` | `treatAsZero` | `treatAsZero` or `exclude` for candidates without a count  |

With `exclude`, a candidate without a declared count is still a candidate of
its party, but it is left out of the case totals and of the average number of
cases per candidate.

The major parties are computed once per selection. The detail views
(`educationBreakdown`, `facetCounts`) use exactly this list when the party scope
is `majorParties`.

*/
