//! Salary file contents in DraftKings layout.

/// WNBA showdown export: captain rows carry their own 1.5x salary and are
/// folded into the matching utility rows.
pub const SHOWDOWN_SALARIES: &str = "\
Position,Name + ID,Name,ID,Roster Position,Salary,Game Info,TeamAbbrev,AvgPointsPerGame
F,A'ja Wilson (101),A'ja Wilson,101,CPT,16500,LVA@NYL 07/01/2025 07:30PM ET,LVA,45.5
F,A'ja Wilson (201),A'ja Wilson,201,UTIL,11000,LVA@NYL 07/01/2025 07:30PM ET,LVA,45.5
F,Breanna Stewart (202),Breanna Stewart,202,UTIL,10600,LVA@NYL 07/01/2025 07:30PM ET,NYL,44.1
G,Sabrina Ionescu (203),Sabrina Ionescu,203,UTIL,9800,LVA@NYL 07/01/2025 07:30PM ET,NYL,39.8
G,Kelsey Plum (204),Kelsey Plum,204,UTIL,9000,LVA@NYL 07/01/2025 07:30PM ET,LVA,35.2
G,Jackie Young (205),Jackie Young,205,UTIL,8600,LVA@NYL 07/01/2025 07:30PM ET,LVA,33.0
C,Jonquel Jones (206),Jonquel Jones,206,UTIL,8200,LVA@NYL 07/01/2025 07:30PM ET,NYL,31.4
G,Chelsea Gray (207),Chelsea Gray,207,UTIL,7400,LVA@NYL 07/01/2025 07:30PM ET,LVA,28.9
G,Courtney Vandersloot (208),Courtney Vandersloot,208,UTIL,6800,LVA@NYL 07/01/2025 07:30PM ET,NYL,24.6
F,Betnijah Laney-Hamilton (209),Betnijah Laney-Hamilton,209,UTIL,5600,LVA@NYL 07/01/2025 07:30PM ET,NYL,20.3
C,Kiah Stokes (210),Kiah Stokes,210,UTIL,3200,LVA@NYL 07/01/2025 07:30PM ET,LVA,9.8
F,Leonie Fiebich (211),Leonie Fiebich,211,UTIL,4000,LVA@NYL 07/01/2025 07:30PM ET,NYL,14.7
";

/// Injury list excluding one showdown player.
pub const SHOWDOWN_INJURIES: &str = "Player,Status\nKelsey Plum,Out\n";
